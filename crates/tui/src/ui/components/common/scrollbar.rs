//! Themed vertical scrollbar for scrollable panes.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::ui::theme::Theme;

/// Draws a scrollbar on the right edge of `area` when `total_rows` does not
/// fit in `viewport_rows`.
pub fn render_vertical_scrollbar(frame: &mut Frame, area: Rect, theme: &dyn Theme, total_rows: u16, position: u16, viewport_rows: u16) {
    if viewport_rows == 0 || total_rows <= viewport_rows {
        return;
    }
    let max_position = usize::from(total_rows - viewport_rows);
    let mut state = ScrollbarState::new(max_position)
        .position(usize::from(position))
        .viewport_content_length(usize::from(viewport_rows));
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None)
        .thumb_style(Style::default().fg(theme.roles().scrollbar_thumb))
        .track_style(Style::default().fg(theme.roles().border));
    frame.render_stateful_widget(scrollbar, area, &mut state);
}
