use std::collections::HashMap;

use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// Lines scrolled before the "back to top" hint appears.
pub const TOP_HINT_THRESHOLD: u16 = 10;

/// Scroll position and item cursor of the content pane.
///
/// The renderer reports the body height, viewport height, item count and
/// heading offsets after each draw; key handlers read them back.
#[derive(Debug)]
pub struct ContentState {
    scroll: u16,
    max_scroll: u16,
    viewport_height: u16,
    /// Selected card (parent pages) or table of contents entry (markdown pages).
    cursor: usize,
    item_count: usize,
    /// Heading anchor to its first line in the wrapped body.
    anchors: HashMap<String, u16>,

    pub container_focus: FocusFlag,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            scroll: 0,
            max_scroll: 0,
            viewport_height: 0,
            cursor: 0,
            item_count: 0,
            anchors: HashMap::new(),
            container_focus: FocusFlag::named("docent.content"),
        }
    }
}

impl ContentState {
    /// Back to the top with the cursor on the first item.
    pub fn reset(&mut self) {
        self.scroll = 0;
        self.cursor = 0;
        self.anchors.clear();
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn show_top_hint(&self) -> bool {
        self.scroll > TOP_HINT_THRESHOLD
    }

    /// Records the wrapped body height and the visible height.
    pub fn set_metrics(&mut self, total_lines: u16, viewport_height: u16) {
        self.viewport_height = viewport_height;
        self.max_scroll = total_lines.saturating_sub(viewport_height);
        self.scroll = self.scroll.min(self.max_scroll);
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn set_anchors(&mut self, anchors: HashMap<String, u16>) {
        self.anchors = anchors;
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll));
        self.scroll = next as u16;
    }

    pub fn page_down(&mut self) {
        self.scroll_by(i32::from(self.viewport_height.saturating_sub(1).max(1)));
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-i32::from(self.viewport_height.saturating_sub(1).max(1)));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Scrolls just enough for rows `start..end` to be on screen.
    pub fn keep_visible(&mut self, start: u16, end: u16, viewport_height: u16) {
        if start < self.scroll {
            self.scroll = start;
        } else if end > self.scroll.saturating_add(viewport_height) {
            self.scroll = end.saturating_sub(viewport_height).min(start);
        }
    }

    /// Scrolls the body so the heading with `anchor` is the first line.
    pub fn scroll_to_anchor(&mut self, anchor: &str) -> bool {
        match self.anchors.get(anchor) {
            Some(line) => {
                self.scroll = (*line).min(self.max_scroll);
                true
            }
            None => false,
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.item_count == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(self.item_count - 1);
    }
}

impl HasFocus for ContentState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_is_clamped_to_the_body() {
        let mut st = ContentState::default();
        st.set_metrics(50, 20);
        st.scroll_by(-5);
        assert_eq!(st.scroll(), 0);
        st.page_down();
        assert_eq!(st.scroll(), 19);
        st.page_down();
        assert_eq!(st.scroll(), 30);
        st.set_metrics(25, 20);
        assert_eq!(st.scroll(), 5);
    }

    #[test]
    fn top_hint_appears_past_threshold() {
        let mut st = ContentState::default();
        st.set_metrics(100, 10);
        st.scroll_by(i32::from(TOP_HINT_THRESHOLD));
        assert!(!st.show_top_hint());
        st.scroll_by(1);
        assert!(st.show_top_hint());
        st.scroll_to_top();
        assert!(!st.show_top_hint());
    }

    #[test]
    fn anchors_scroll_the_body() {
        let mut st = ContentState::default();
        st.set_metrics(40, 10);
        st.set_anchors(HashMap::from([("setup".to_string(), 12), ("end".to_string(), 39)]));
        assert!(st.scroll_to_anchor("setup"));
        assert_eq!(st.scroll(), 12);
        assert!(st.scroll_to_anchor("end"));
        assert_eq!(st.scroll(), 30);
        assert!(!st.scroll_to_anchor("missing"));
    }

    #[test]
    fn keep_visible_scrolls_minimally() {
        let mut st = ContentState::default();
        st.set_metrics(100, 10);
        st.keep_visible(14, 17, 10);
        assert_eq!(st.scroll(), 7);
        st.keep_visible(8, 10, 10);
        assert_eq!(st.scroll(), 7);
        st.keep_visible(2, 4, 10);
        assert_eq!(st.scroll(), 2);
    }

    #[test]
    fn reset_returns_to_top() {
        let mut st = ContentState::default();
        st.set_metrics(40, 10);
        st.set_item_count(3);
        st.move_cursor(5);
        st.scroll_by(8);
        assert_eq!(st.cursor(), 2);
        st.reset();
        assert_eq!((st.scroll(), st.cursor()), (0, 0));
    }
}
