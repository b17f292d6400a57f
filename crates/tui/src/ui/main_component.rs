//! Top-level layout: sidebar, breadcrumbs over content, optional chat panel,
//! and the hints bar.
//!
//! Global keys are handled here before routing to the focused pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use docent_types::{Effect, Msg};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::Paragraph,
};

use super::components::{BreadcrumbsComponent, ChatComponent, Component, ContentComponent, SidebarComponent};
use super::theme::theme_helpers as th;
use crate::app::App;

/// Sidebar width in columns.
const SIDEBAR_WIDTH: u16 = 32;

/// Below this width the chat panel is stacked under the content pane.
const WIDE_LAYOUT_MIN_WIDTH: u16 = 110;

#[derive(Debug, Default)]
pub struct MainView {
    pub sidebar_view: SidebarComponent,
    pub breadcrumbs_view: BreadcrumbsComponent,
    pub content_view: ContentComponent,
    pub chat_view: ChatComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts focus back on a pane after the focused one disappeared.
    pub fn restore_focus(&mut self, app: &mut App) {
        app.focus.focus(&app.content.container_focus);
        if app.focus.focused().is_none() {
            app.focus.first();
        }
    }

    /// True when keystrokes belong to a text field.
    fn text_input_focused(app: &App) -> bool {
        app.sidebar.f_search.get() || (app.chat.open && app.chat.f_input.get())
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => return vec![Effect::ToggleSidebar],
                KeyCode::Char('t') => return vec![Effect::ToggleChat],
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            KeyCode::Char('q') if key.modifiers.is_empty() && !Self::text_input_focused(app) => {
                return vec![Effect::Quit];
            }
            _ => {}
        }

        if app.sidebar_visible && app.sidebar.container_focus.get() {
            return self.sidebar_view.handle_key_events(app, key);
        }
        if app.chat.open && app.chat.container_focus.get() {
            return self.chat_view.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        if app.sidebar_visible {
            effects.extend(self.sidebar_view.handle_mouse_events(app, mouse));
        }
        effects.extend(self.breadcrumbs_view.handle_mouse_events(app, mouse));
        effects.extend(self.content_view.handle_mouse_events(app, mouse));
        if app.chat.open {
            effects.extend(self.chat_view.handle_mouse_events(app, mouse));
        }
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        if app.sidebar_visible {
            self.sidebar_view.render(frame, layout[0], app);
        }
        self.breadcrumbs_view.render(frame, layout[1], app);
        self.content_view.render(frame, layout[2], app);
        if app.chat.open {
            self.chat_view.render(frame, layout[3], app);
        }

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[4]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        if app.sidebar_visible && app.sidebar.container_focus.get() {
            hint_spans.extend(self.sidebar_view.get_hint_spans(app));
        } else if app.chat.open && app.chat.container_focus.get() {
            hint_spans.extend(self.chat_view.get_hint_spans(app));
        } else {
            hint_spans.extend(self.content_view.get_hint_spans(app));
        }
        let chat_hint = if app.chat.open { " Close chat " } else { " Ask the docs " };
        let sidebar_hint = if app.sidebar_visible { " Hide topics " } else { " Show topics " };
        hint_spans.extend(th::build_hint_spans(
            &*app.ctx.theme,
            &[("Tab", " Next pane "), ("Ctrl+T", chat_hint), ("Ctrl+B", sidebar_hint)],
        ));
        hint_spans
    }

    /// `[sidebar, breadcrumbs, content, chat, hints]`; hidden panes get an
    /// empty area.
    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Panes
            Constraint::Length(1), // Hints bar
        ])
        .split(area);

        let sidebar_width = if app.sidebar_visible { SIDEBAR_WIDTH.min(rows[0].width / 2) } else { 0 };
        let columns = Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(1)]).split(rows[0]);

        let wide = columns[1].width >= WIDE_LAYOUT_MIN_WIDTH;
        let chat_constraint = if app.chat.open { Constraint::Percentage(40) } else { Constraint::Length(0) };
        let main_areas = if wide {
            Layout::horizontal([Constraint::Min(1), chat_constraint]).split(columns[1])
        } else {
            Layout::vertical([Constraint::Min(1), chat_constraint]).split(columns[1])
        };

        let center = Layout::vertical([
            Constraint::Length(1), // Breadcrumbs
            Constraint::Min(1),    // Content
        ])
        .split(main_areas[0]);

        vec![columns[0], center[0], center[1], main_areas[1], rows[1]]
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::test_app;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn q_quits_only_outside_text_inputs() {
        let mut app = test_app();
        let mut view = MainView::new();
        app.focus.focus(&app.content.container_focus);
        assert_eq!(view.handle_key_events(&mut app, key(KeyCode::Char('q'), KeyModifiers::NONE)), vec![Effect::Quit]);

        app.focus.focus(&app.sidebar.f_search);
        assert!(view.handle_key_events(&mut app, key(KeyCode::Char('q'), KeyModifiers::NONE)).is_empty());
        assert_eq!(app.sidebar.query(), "q");
    }

    #[test]
    fn control_keys_toggle_panes() {
        let mut app = test_app();
        let mut view = MainView::new();
        assert_eq!(
            view.handle_key_events(&mut app, key(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            vec![Effect::ToggleChat]
        );
        assert_eq!(
            view.handle_key_events(&mut app, key(KeyCode::Char('b'), KeyModifiers::CONTROL)),
            vec![Effect::ToggleSidebar]
        );
    }

    #[test]
    fn hidden_panes_get_no_area() {
        let mut app = test_app();
        let view = MainView::new();
        app.sidebar_visible = false;
        let areas = view.get_preferred_layout(&app, Rect::new(0, 0, 120, 40));
        assert_eq!(areas[0].width, 0);
        assert_eq!(areas[3].area(), 0);
        assert_eq!(areas[1].height, 1);
        assert_eq!(areas[4].y, 39);
    }

    #[test]
    fn renders_the_overview_with_breadcrumbs() {
        let mut app = test_app();
        let mut view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|frame| view.render(frame, frame.area(), &mut app))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Home"));
        assert!(text.contains("Agency Space"));
        assert!(text.contains("Welcome"));
        assert!(text.contains("Hints:"));
    }
}
