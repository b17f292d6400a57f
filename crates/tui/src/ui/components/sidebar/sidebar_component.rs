//! Sidebar component: search box and the collapsible topic tree.
//!
//! Typing in the search box filters the tree by title. In the tree, Enter
//! or a click on a group toggles it open or closed, while Enter or a click on
//! a topic navigates to it. The row matching the active topic is drawn with
//! the selection style; the keyboard cursor is marked with `›`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use docent_content::SidebarRow;
use docent_types::Effect;
use docent_util::match_ranges_ignore_case;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{HighlightSpacing, List, ListItem, Paragraph},
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

#[derive(Debug, Default, Clone, Copy)]
struct SidebarLayout {
    search_area: Rect,
    list_area: Rect,
}

#[derive(Debug, Default)]
pub struct SidebarComponent {
    layout: SidebarLayout,
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.sidebar.f_search.get() {
            self.handle_search_keys(app, key);
            Vec::new()
        } else {
            self.handle_tree_keys(app, key)
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.layout.search_area.contains(pos) {
                    app.focus.focus(&app.sidebar.f_search);
                    return Vec::new();
                }
                if self.layout.list_area.contains(pos) {
                    app.focus.focus(&app.sidebar.f_tree);
                    if let Some(index) = self.hit_test_list(app, pos) {
                        return app.sidebar.activate(index);
                    }
                }
            }
            MouseEventKind::ScrollDown if self.layout.list_area.contains(pos) => app.sidebar.move_selection(1),
            MouseEventKind::ScrollUp if self.layout.list_area.contains(pos) => app.sidebar.move_selection(-1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let areas = self.get_preferred_layout(app, rect);
        self.render_search_panel(frame, app, areas[0]);
        let list_area = self.render_tree_panel(frame, app, areas[1]);
        self.layout = SidebarLayout {
            search_area: areas[0],
            list_area,
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        if app.sidebar.f_search.get() {
            th::build_hint_spans(theme, &[("Esc", " Clear "), ("↓/Enter", " Topics ")])
        } else {
            th::build_hint_spans(theme, &[("Enter", " Open "), ("←/→", " Collapse/expand "), ("/", " Search ")])
        }
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(3), // Search box
            Constraint::Min(1),    // Topic tree
        ])
        .split(area)
        .to_vec()
    }
}

impl SidebarComponent {
    fn handle_search_keys(&self, app: &mut App, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => app.sidebar.clear_search(),
            KeyCode::Char(character) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                if !character.is_control() {
                    app.sidebar.insert_search_char(character);
                }
            }
            KeyCode::Backspace => app.sidebar.search_backspace(),
            KeyCode::Left => app.sidebar.search.move_left(),
            KeyCode::Right => app.sidebar.search.move_right(),
            KeyCode::Down | KeyCode::Enter => {
                app.focus.focus(&app.sidebar.f_tree);
            }
            _ => {}
        }
    }

    fn handle_tree_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.sidebar.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => app.sidebar.move_selection(-1),
            KeyCode::Home => app.sidebar.select_first(),
            KeyCode::End => app.sidebar.select_last(),
            KeyCode::Right => {
                if let Some(id) = app.sidebar.selected_row().filter(|row| row.has_children).map(|row| row.id.clone()) {
                    app.sidebar.set_expanded(&id, true);
                }
            }
            KeyCode::Left => app.sidebar.collapse_or_ascend(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(index) = app.sidebar.selected_index() {
                    return app.sidebar.activate(index);
                }
            }
            KeyCode::Char('/') => {
                app.focus.focus(&app.sidebar.f_search);
            }
            KeyCode::Esc if !app.sidebar.query().is_empty() => app.sidebar.clear_search(),
            _ => {}
        }
        Vec::new()
    }

    fn render_search_panel(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = &*app.ctx.theme;
        let is_focused = app.sidebar.f_search.get();
        let search_block = th::block(theme, Some("Search"), is_focused);
        let inner_area = search_block.inner(area);
        let query = app.sidebar.query();
        let content_line = if query.is_empty() && !is_focused {
            Line::from(Span::styled("Filter topics…", theme.text_muted_style()))
        } else {
            Line::from(Span::styled(query.to_string(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(content_line).block(search_block), area);

        if is_focused {
            let cursor_x = inner_area.x.saturating_add(app.sidebar.search.cursor_column());
            frame.set_cursor_position((cursor_x, inner_area.y));
        }
    }

    fn render_tree_panel(&self, frame: &mut Frame, app: &mut App, area: Rect) -> Rect {
        let theme = &*app.ctx.theme;
        let is_focused = app.sidebar.f_tree.get();
        let title = app.ctx.store.title.clone();
        let block = th::block(theme, Some(&title), is_focused);
        let inner_area = block.inner(area);

        let active = app.active_topic();
        let query = app.sidebar.query().trim();
        let items: Vec<ListItem> = if app.sidebar.rows().is_empty() {
            vec![ListItem::new(Span::styled("No matching topics", theme.text_muted_style()))]
        } else {
            app.sidebar
                .rows()
                .iter()
                .map(|row| sidebar_item(theme, row, query, active == Some(row.id.as_str())))
                .collect()
        };

        let highlight_symbol = if is_focused { "› " } else { "  " };
        let list = List::new(items)
            .block(block)
            .highlight_symbol(highlight_symbol)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_style(theme.accent_emphasis_style());
        frame.render_stateful_widget(list, area, &mut app.sidebar.list_state);
        inner_area
    }

    fn hit_test_list(&self, app: &App, pos: Position) -> Option<usize> {
        let index = pos.y.saturating_sub(self.layout.list_area.y) as usize + app.sidebar.list_state.offset();
        (index < app.sidebar.rows().len()).then_some(index)
    }
}

fn sidebar_item(theme: &dyn Theme, row: &SidebarRow, query: &str, is_active: bool) -> ListItem<'static> {
    let base = if is_active {
        theme.selection_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_primary_style()
    };
    let highlight = base.patch(theme.accent_primary_style()).add_modifier(Modifier::UNDERLINED);

    let mut spans = vec![Span::raw("  ".repeat(row.depth))];
    let marker = match (row.has_children, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    spans.push(Span::styled(marker, theme.text_muted_style()));
    if let Some(icon) = row.icon {
        spans.push(Span::styled(format!("{} ", th::icon_glyph(icon)), theme.accent_primary_style()));
    }
    let ranges = match_ranges_ignore_case(&row.title, query);
    spans.extend(th::highlight_spans(&row.title, &ranges, base, highlight));

    let item = ListItem::new(Line::from(spans));
    if is_active { item.style(base) } else { item }
}
