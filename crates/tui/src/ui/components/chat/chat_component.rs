//! Chat panel: transcript above a single-line composer.
//!
//! Enter sends the composed question, Esc closes the panel, PageUp and
//! PageDown page through older turns. The composer is read-only while a
//! reply is pending. Assistant replies are rendered as markdown; user turns
//! are shown verbatim.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use docent_api::APOLOGY;
use docent_content::parse_blocks;
use docent_types::{ChatTurn, Effect, Sender};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::state::GREETING;
use crate::app::App;
use crate::ui::components::common::markdown_view::render_blocks;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const PAGE_STEP: u16 = 5;

#[derive(Debug, Default, Clone, Copy)]
struct ChatLayout {
    transcript_area: Rect,
    input_area: Rect,
}

#[derive(Debug, Default)]
pub struct ChatComponent {
    layout: ChatLayout,
}

impl Component for ChatComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter => {
                return app.chat.begin_send().map(Effect::SendChat).into_iter().collect();
            }
            KeyCode::Esc => return vec![Effect::ToggleChat],
            KeyCode::PageUp => app.chat.scroll_back = app.chat.scroll_back.saturating_add(PAGE_STEP),
            KeyCode::PageDown => app.chat.scroll_back = app.chat.scroll_back.saturating_sub(PAGE_STEP),
            KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete if app.chat.is_pending() => {}
            KeyCode::Char(character) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                if !character.is_control() {
                    app.chat.input.insert_char(character);
                }
            }
            KeyCode::Backspace => app.chat.input.backspace(),
            KeyCode::Delete => app.chat.input.delete(),
            KeyCode::Left => app.chat.input.move_left(),
            KeyCode::Right => app.chat.input.move_right(),
            KeyCode::Home => app.chat.input.move_home(),
            KeyCode::End => app.chat.input.move_end(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        let in_transcript = self.layout.transcript_area.contains(pos);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if in_transcript || self.layout.input_area.contains(pos) => {
                app.focus.focus(&app.chat.f_input);
            }
            MouseEventKind::ScrollUp if in_transcript => app.chat.scroll_back = app.chat.scroll_back.saturating_add(1),
            MouseEventKind::ScrollDown if in_transcript => app.chat.scroll_back = app.chat.scroll_back.saturating_sub(1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let areas = self.get_preferred_layout(app, rect);
        let transcript_area = self.render_transcript(frame, app, areas[0]);
        self.render_input(frame, app, areas[1]);
        self.layout = ChatLayout {
            transcript_area,
            input_area: areas[1],
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        th::build_hint_spans(theme, &[("Enter", " Send "), ("PgUp/PgDn", " Scroll "), ("Esc", " Close ")])
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Composer
        ])
        .split(area)
        .to_vec()
    }
}

impl ChatComponent {
    fn render_transcript(&self, frame: &mut Frame, app: &mut App, area: Rect) -> Rect {
        let theme = &*app.ctx.theme;
        let focused = app.chat.container_focus.get();
        let block = th::block(theme, Some("Ask the docs"), focused);
        let inner = block.inner(area);

        let mut lines: Vec<Line<'static>> = Vec::new();
        if app.chat.transcript().is_empty() && !app.chat.is_pending() {
            lines.push(Line::from(Span::styled(GREETING, theme.text_muted_style())));
        }
        for turn in app.chat.transcript() {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(turn_lines(theme, turn));
        }
        if app.chat.is_pending() {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                app.chat.loading_text(),
                theme.text_muted_style().add_modifier(Modifier::ITALIC),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let total = paragraph.line_count(inner.width).min(u16::MAX as usize) as u16;
        let bottom = total.saturating_sub(inner.height);
        app.chat.scroll_back = app.chat.scroll_back.min(bottom);
        let scroll = bottom - app.chat.scroll_back;
        frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
        inner
    }

    fn render_input(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = &*app.ctx.theme;
        let is_focused = app.chat.f_input.get();
        let mut block = th::block(theme, Some("Message"), is_focused);
        if app.chat.is_pending() {
            block = block.title_bottom(Line::from(Span::styled(" waiting for reply ", theme.text_muted_style())).right_aligned());
        }
        let inner = block.inner(area);
        let input = app.chat.input.input();
        let line = if input.is_empty() && !is_focused {
            Line::from(Span::styled("Type a question…", theme.text_muted_style()))
        } else if app.chat.is_pending() {
            Line::from(Span::styled(input.to_string(), theme.text_muted_style()))
        } else {
            Line::from(Span::styled(input.to_string(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if is_focused {
            let cursor_x = inner.x.saturating_add(app.chat.input.cursor_column());
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }
}

fn turn_lines(theme: &dyn Theme, turn: &ChatTurn) -> Vec<Line<'static>> {
    let label_style = match turn.sender {
        Sender::User => theme.accent_primary_style(),
        Sender::Assistant => theme.accent_emphasis_style(),
    }
    .add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(turn.sender.to_string(), label_style))];
    match turn.sender {
        Sender::User => lines.extend(
            turn.text
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), theme.text_primary_style()))),
        ),
        Sender::Assistant if turn.text == APOLOGY => {
            lines.push(Line::from(Span::styled(APOLOGY, theme.error_style())));
        }
        Sender::Assistant => lines.extend(render_blocks(&parse_blocks(&turn.text), theme).lines),
    }
    lines
}
