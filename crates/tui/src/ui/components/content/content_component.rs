//! Content pane: renders the active topic.
//!
//! The view is derived from the active topic and cached per topic id:
//! - no topic: a call to action
//! - parent topic: its summary plus one selectable card per child
//! - structured leaf: description, features, benefits, examples, steps
//! - markdown leaf: an "On this page" list above the wrapped body
//!
//! Up/Down move between cards or contents entries, Enter opens the card or
//! jumps to the heading, j/k and PageUp/PageDown scroll, g returns to the top
//! and Backspace goes up one level.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use docent_content::{Card, ContentView, EMPTY_STATE_TEXT, Heading, Section, Step};
use docent_types::Effect;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::components::common::markdown_view::{render_blocks, wrapped_offsets};
use crate::ui::components::common::scrollbar::render_vertical_scrollbar;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

/// Largest number of rows given to the "On this page" list.
const TOC_MAX_ROWS: u16 = 8;

/// Lines moved per mouse wheel notch.
const WHEEL_STEP: i32 = 3;

#[derive(Debug, Default, Clone)]
struct ContentLayout {
    toc_area: Rect,
    body_area: Rect,
    /// Body rows (start, end) of each card, before scrolling.
    card_rows: Vec<(u16, u16)>,
}

#[derive(Debug, Default)]
pub struct ContentComponent {
    layout: ContentLayout,
    cached: Option<(Option<String>, ContentView)>,
    /// Card cursor at the previous draw; scrolling follows it only when it moves.
    last_card_cursor: usize,
}

impl ContentComponent {
    /// The view for the active topic, rebuilt only when the topic changes.
    fn view(&mut self, app: &App) -> &ContentView {
        let topic = app.active_topic().map(str::to_string);
        if self.cached.as_ref().is_some_and(|(cached_topic, _)| *cached_topic != topic) {
            self.cached = None;
        }
        &self.cached.get_or_insert_with(|| (topic, app.content_view())).1
    }

    fn activate_cursor(&mut self, app: &mut App) -> Vec<Effect> {
        let cursor = app.content.cursor();
        match self.view(app) {
            ContentView::Cards { cards, .. } => cards
                .get(cursor)
                .map(|card| vec![Effect::SelectTopic(card.id.clone())])
                .unwrap_or_default(),
            ContentView::Markdown { toc, .. } => {
                if let Some(heading) = toc.get(cursor) {
                    let anchor = heading.anchor();
                    app.content.scroll_to_anchor(&anchor);
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn has_items(&mut self, app: &App) -> bool {
        match self.view(app) {
            ContentView::Cards { cards, .. } => !cards.is_empty(),
            ContentView::Markdown { toc, .. } => !toc.is_empty(),
            _ => false,
        }
    }

    fn go_up(&self, app: &App) -> Vec<Effect> {
        let parent = app.parent_topic();
        if app.active_topic() == Some(parent.as_str()) {
            return Vec::new();
        }
        vec![Effect::SelectTopic(parent)]
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let block = th::block(theme, None, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let top = inner.y + inner.height.saturating_sub(2) / 2;
        let text_area = Rect::new(inner.x, top, inner.width, inner.height.min(2));
        let lines = vec![
            Line::from(Span::styled(EMPTY_STATE_TEXT, theme.accent_emphasis_style())),
            Line::from(Span::styled("Tab moves between panes", theme.text_muted_style())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect, app: &mut App, title: &str, lines: Vec<Line<'static>>, wrap: bool) {
        let theme = &*app.ctx.theme;
        let focused = app.content.container_focus.get();
        let mut block = th::block(theme, Some(title), focused);
        if app.content.show_top_hint() {
            block = block.title_bottom(Line::from(Span::styled(" ↑ top (g) ", theme.text_muted_style())).right_aligned());
        }
        let inner = block.inner(area);

        let mut paragraph = Paragraph::new(lines);
        if wrap {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        let total = paragraph.line_count(inner.width).min(u16::MAX as usize) as u16;
        app.content.set_metrics(total, inner.height);
        frame.render_widget(paragraph.scroll((app.content.scroll(), 0)).block(block), area);
        // Drawn over the right border, between the corners.
        let track = Rect {
            y: inner.y,
            height: inner.height,
            ..area
        };
        render_vertical_scrollbar(frame, track, theme, total, app.content.scroll(), inner.height);
        self.layout.body_area = inner;
    }

    fn render_cards(&mut self, frame: &mut Frame, area: Rect, app: &mut App, title: &str, description: Option<&str>, cards: &[Card]) {
        let theme = &*app.ctx.theme;
        let width = area.width.saturating_sub(4).max(10) as usize;
        let cursor = app.content.cursor();
        let focused = app.content.container_focus.get();

        let mut lines: Vec<Line<'static>> = Vec::new();
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            lines.extend(wrap_styled(description, width, "", "", theme.text_secondary_style()));
            lines.push(Line::default());
        }

        let mut card_rows = Vec::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            let start = lines.len() as u16;
            let selected = index == cursor;
            let marker = if selected && focused { "› " } else { "  " };
            let title_style = if selected {
                theme.selection_style().add_modifier(Modifier::BOLD)
            } else {
                theme.accent_emphasis_style()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, theme.accent_primary_style()),
                Span::styled(card.title.clone(), title_style),
            ]));
            if !card.excerpt.is_empty() {
                lines.extend(wrap_styled(&card.excerpt, width, "  ", "  ", theme.text_muted_style()));
            }
            card_rows.push((start, lines.len() as u16));
            lines.push(Line::default());
        }

        app.content.set_item_count(cards.len());
        if cursor != self.last_card_cursor
            && let Some(&(start, end)) = card_rows.get(cursor)
        {
            app.content.keep_visible(start, end, area.height.saturating_sub(2));
        }
        self.last_card_cursor = cursor;
        self.render_body(frame, area, app, title, lines, false);
        self.layout.card_rows = card_rows;
    }

    fn render_structured(&mut self, frame: &mut Frame, area: Rect, app: &mut App, title: &str, sections: &[Section]) {
        let theme = &*app.ctx.theme;
        let width = area.width.saturating_sub(4).max(10) as usize;
        let mut lines: Vec<Line<'static>> = Vec::new();
        for section in sections {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            if let Some(heading) = section.heading() {
                lines.push(Line::from(Span::styled(heading, theme.heading_style(2))));
            }
            match section {
                Section::Description(text) => lines.extend(wrap_styled(text, width, "", "", theme.text_primary_style())),
                Section::Features(items) | Section::Benefits(items) | Section::Examples(items) => {
                    for item in items {
                        lines.extend(wrap_styled(item, width, "  • ", "    ", theme.text_primary_style()));
                    }
                }
                Section::Steps(steps) => lines.extend(step_lines(steps, width, theme)),
            }
        }
        app.content.set_item_count(0);
        self.render_body(frame, area, app, title, lines, false);
        self.layout.card_rows.clear();
    }

    fn render_markdown(&mut self, frame: &mut Frame, area: Rect, app: &mut App, title: &str, view: &ContentView) {
        let ContentView::Markdown { blocks, toc, .. } = view else {
            return;
        };
        let areas = if toc.is_empty() {
            vec![Rect::default(), area]
        } else {
            let toc_height = (toc.len() as u16).min(TOC_MAX_ROWS) + 2;
            Layout::vertical([Constraint::Length(toc_height), Constraint::Min(3)]).split(area).to_vec()
        };

        if !toc.is_empty() {
            self.render_toc(frame, areas[0], app, toc);
        }
        app.content.set_item_count(toc.len());

        let rendered = render_blocks(blocks, &*app.ctx.theme);
        let body_width = areas[1].width.saturating_sub(2);
        let anchors: HashMap<String, u16> = wrapped_offsets(&rendered.lines, &rendered.headings, body_width)
            .into_iter()
            .rev()
            .collect();
        app.content.set_anchors(anchors);
        self.render_body(frame, areas[1], app, title, rendered.lines, true);
        self.layout.toc_area = areas[0];
        self.layout.card_rows.clear();
    }

    fn render_toc(&self, frame: &mut Frame, area: Rect, app: &App, toc: &[Heading]) {
        let theme = &*app.ctx.theme;
        let focused = app.content.container_focus.get();
        let min_level = toc.iter().map(|heading| heading.level).min().unwrap_or(1);
        let items: Vec<ListItem> = toc
            .iter()
            .map(|heading| {
                let indent = "  ".repeat(usize::from(heading.level - min_level));
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(heading.text.clone(), theme.link_style()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(th::block(theme, Some("On this page"), false))
            .highlight_symbol(if focused { "› " } else { "  " })
            .highlight_style(theme.selection_style());
        let mut state = ListState::default().with_selected(Some(app.content.cursor()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn hit_test_card(&self, app: &App, pos: Position) -> Option<usize> {
        if !self.layout.body_area.contains(pos) {
            return None;
        }
        let row = pos.y - self.layout.body_area.y + app.content.scroll();
        self.layout
            .card_rows
            .iter()
            .position(|&(start, end)| row >= start && row < end)
    }

    fn hit_test_toc(&self, app: &App, pos: Position) -> Option<usize> {
        let inner = Rect {
            x: self.layout.toc_area.x,
            y: self.layout.toc_area.y + 1,
            width: self.layout.toc_area.width,
            height: self.layout.toc_area.height.saturating_sub(2),
        };
        if !inner.contains(pos) {
            return None;
        }
        // The list keeps the cursor visible, so rows past the viewport shift.
        let viewport = usize::from(inner.height);
        let offset = (app.content.cursor() + 1).saturating_sub(viewport);
        Some(usize::from(pos.y - inner.y) + offset)
    }
}

impl Component for ContentComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Down => {
                if self.has_items(app) {
                    app.content.move_cursor(1);
                } else {
                    app.content.scroll_by(1);
                }
            }
            KeyCode::Up => {
                if self.has_items(app) {
                    app.content.move_cursor(-1);
                } else {
                    app.content.scroll_by(-1);
                }
            }
            KeyCode::Char('j') => app.content.scroll_by(1),
            KeyCode::Char('k') => app.content.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => app.content.page_down(),
            KeyCode::PageUp => app.content.page_up(),
            KeyCode::Char('g') | KeyCode::Home => app.content.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => app.content.scroll_by(i32::from(u16::MAX)),
            KeyCode::Enter => return self.activate_cursor(app),
            KeyCode::Backspace => return self.go_up(app),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        let inside = self.layout.body_area.contains(pos) || self.layout.toc_area.contains(pos);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                app.focus.focus(&app.content.container_focus);
                if let Some(index) = self.hit_test_card(app, pos) {
                    app.content.move_cursor(index as isize - app.content.cursor() as isize);
                    return self.activate_cursor(app);
                }
                if let Some(index) = self.hit_test_toc(app, pos) {
                    app.content.move_cursor(index as isize - app.content.cursor() as isize);
                    return self.activate_cursor(app);
                }
            }
            MouseEventKind::ScrollDown if inside => app.content.scroll_by(WHEEL_STEP),
            MouseEventKind::ScrollUp if inside => app.content.scroll_by(-WHEEL_STEP),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let view = self.view(app).clone();
        self.layout.toc_area = Rect::default();
        match &view {
            ContentView::Empty => {
                self.render_empty(frame, rect, &*app.ctx.theme);
                self.layout = ContentLayout {
                    body_area: rect,
                    ..ContentLayout::default()
                };
            }
            ContentView::Cards {
                title,
                description,
                cards,
            } => self.render_cards(frame, rect, app, title, description.as_deref(), cards),
            ContentView::Structured { title, sections } => self.render_structured(frame, rect, app, title, sections),
            ContentView::Markdown { title, .. } => self.render_markdown(frame, rect, app, title, &view),
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        match self.cached.as_ref().map(|(_, view)| view) {
            Some(ContentView::Cards { .. }) => {
                th::build_hint_spans(theme, &[("↑/↓", " Card "), ("Enter", " Open "), ("Bksp", " Up ")])
            }
            Some(ContentView::Markdown { toc, .. }) if !toc.is_empty() => th::build_hint_spans(
                theme,
                &[("↑/↓", " Contents "), ("Enter", " Jump "), ("j/k", " Scroll "), ("g", " Top "), ("Bksp", " Up ")],
            ),
            _ => th::build_hint_spans(theme, &[("j/k", " Scroll "), ("g", " Top "), ("Bksp", " Up ")]),
        }
    }
}

/// Word-wraps `text` into styled lines with the given indents.
fn wrap_styled(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str, style: ratatui::style::Style) -> Vec<Line<'static>> {
    let options = textwrap::Options::new(width)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| Line::from(Span::styled(line.into_owned(), style)))
        .collect()
}

fn step_lines(steps: &[Step], width: usize, theme: &dyn Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let number = format!("  {}. ", index + 1);
        let hanging = " ".repeat(number.len());
        lines.extend(wrap_styled(&step.text, width, &number, &hanging, theme.text_primary_style()));
        if let Some(image) = &step.image {
            lines.push(Line::from(Span::styled(format!("{hanging}▣ image: {image}"), theme.text_muted_style())));
        }
    }
    lines
}
