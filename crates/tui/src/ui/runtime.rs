//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop that handles input, ticks and chat replies.
//! - Route keys to the focused pane and execute the returned `Effect`s.
//! - Redraw only after something visible changed.
//!
//! Event Loop Strategy
//! - A dedicated input task polls `crossterm` and forwards events over a
//!   channel, so the loop never blocks on the terminal.
//! - Smart ticking: fast interval (100 ms) only while a chat request is in
//!   flight (loading dots); long interval (5 s) when idle.
//! - Chat requests run as tokio tasks tracked in a `FuturesUnordered`; each
//!   resolves to the reply text, delivered as `Msg::ChatReplied`.
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docent_api::{APOLOGY, ChatTransport, WebhookClient};
use docent_content::ContentStore;
use docent_types::{Effect, Msg};
use docent_util::DocentConfig;
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::{App, SharedCtx};
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;
use crate::ui::theme;

/// Spawn the input task that polls the terminal and forwards `crossterm`
/// events over a Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_move = Instant::now();

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            match event::poll(sixteen_ms) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    // Throttle mouse move events to once per 16 ms.
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if let Err(e) = sender.send(event).await {
                        warn!("Failed to send event: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read event: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draws one frame through [`MainView`].
fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so pane visibility changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = Rc::new(FocusBuilder::rebuild_for(app, Some(Rc::unwrap_or_clone(old_focus))));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Route a raw crossterm event to the main view.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Applies app-level effects, then turns whatever is left into commands.
fn process_effects(app: &mut App, effects: Vec<Effect>, pending_replies: &mut FuturesUnordered<JoinHandle<String>>) {
    if effects.is_empty() {
        return;
    }
    let remaining = app.apply_effects(effects);
    let commands = cmd::from_effects(remaining);
    if commands.is_empty() {
        return;
    }
    let batch = cmd::run_cmds(&app.ctx.transport, commands);
    pending_replies.extend(batch.pending);
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// task, runs the event loop, and restores the terminal on exit.
pub async fn run_app(store: Arc<ContentStore>, config: DocentConfig) -> Result<()> {
    let transport: Arc<dyn ChatTransport> = Arc::new(
        WebhookClient::new(config.webhook_url.clone(), config.chat_timeout).context("building the chat webhook client")?,
    );
    let ctx = SharedCtx::new(theme::load(config.theme), store, transport);
    let mut app = App::new(ctx, config.initial_topic.clone());
    let mut main_view = MainView::new();
    info!(topic = ?app.active_topic(), theme = ?config.theme, "starting TUI");

    let mut input_receiver = spawn_input_thread().await;
    let mut terminal = setup_terminal()?;
    let mut pending_replies: FuturesUnordered<JoinHandle<String>> = FuturesUnordered::new();

    // Ticking strategy: fast while animating, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    // Track the last known terminal size to synthesize Resize messages when
    // some terminals fail to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    while !app.should_quit {
        let needs_animation = app.is_animating();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
                        break;
                    }
                let effects = handle_input_event(&mut app, &mut main_view, event);
                process_effects(&mut app, effects, &mut pending_replies);
                true
            }

            // Periodic animation tick
            _ = ticker.tick() => {
                let effects = main_view.handle_message(&mut app, Msg::Tick);
                process_effects(&mut app, effects, &mut pending_replies);
                needs_animation
            }

            Some(joined) = pending_replies.next(), if !pending_replies.is_empty() => {
                let reply = joined.unwrap_or_else(|error| {
                    warn!("Chat task failed: {}", error);
                    APOLOGY.to_string()
                });
                let effects = main_view.handle_message(&mut app, Msg::ChatReplied(reply));
                process_effects(&mut app, effects, &mut pending_replies);
                true
            }

            // Handle Ctrl+C
            _ = signal::ctrl_c() => { break; }
        };

        // Fallback: detect terminal size changes even if no explicit Resize
        // event was received.
        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            let _ = app.update(&Msg::Resize(w, h));
            needs_render = true;
        }

        if needs_render && !app.should_quit {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    info!("TUI closed");
    Ok(())
}
