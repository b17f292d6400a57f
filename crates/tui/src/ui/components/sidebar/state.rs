use std::collections::HashSet;
use std::sync::Arc;

use docent_content::{ContentStore, SidebarRow, default_expanded, sidebar_rows};
use docent_types::Effect;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};
use tracing::debug;

use crate::ui::components::common::TextInputState;

/// Sidebar state: search query, expansion sets and the flattened rows.
///
/// Rows are recomputed whenever the query or the expansion sets change, so
/// the renderer and the key handlers always agree on what index means what.
#[derive(Debug)]
pub struct SidebarState {
    store: Arc<ContentStore>,
    pub search: TextInputState,
    expanded: HashSet<String>,
    /// Parents the user closed while the current search held them open.
    /// Reset whenever the query changes.
    collapsed: HashSet<String>,
    rows: Vec<SidebarRow>,
    pub list_state: ListState,

    pub container_focus: FocusFlag,
    pub f_search: FocusFlag,
    pub f_tree: FocusFlag,
}

impl SidebarState {
    pub fn new(store: Arc<ContentStore>) -> Self {
        let expanded = default_expanded(store.topics());
        let mut state = Self {
            store,
            search: TextInputState::new(),
            expanded,
            collapsed: HashSet::new(),
            rows: Vec::new(),
            list_state: ListState::default(),
            container_focus: FocusFlag::named("docent.sidebar"),
            f_search: FocusFlag::named("docent.sidebar.search"),
            f_tree: FocusFlag::named("docent.sidebar.tree"),
        };
        state.refresh();
        state
    }

    pub fn rows(&self) -> &[SidebarRow] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        self.search.input()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected().filter(|index| *index < self.rows.len())
    }

    pub fn selected_row(&self) -> Option<&SidebarRow> {
        self.selected_index().and_then(|index| self.rows.get(index))
    }

    /// Position of `id` among the visible rows.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Rebuilds the rows and keeps the cursor on the same topic when it is
    /// still visible.
    pub fn refresh(&mut self) {
        let selected_id = self.selected_row().map(|row| row.id.clone());
        self.rows = sidebar_rows(self.store.topics(), &self.expanded, &self.collapsed, self.search.input());
        let index = selected_id
            .and_then(|id| self.index_of(&id))
            .or_else(|| (!self.rows.is_empty()).then_some(0));
        self.list_state.select(index);
    }

    // ===== SEARCH =====

    pub fn insert_search_char(&mut self, c: char) {
        self.search.insert_char(c);
        self.query_changed();
    }

    pub fn search_backspace(&mut self) {
        self.search.backspace();
        self.query_changed();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.query_changed();
    }

    fn query_changed(&mut self) {
        self.collapsed.clear();
        self.refresh();
    }

    // ===== CURSOR =====

    pub fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.selected_index().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        self.list_state.select((!self.rows.is_empty()).then_some(0));
    }

    pub fn select_last(&mut self) {
        self.list_state.select(self.rows.len().checked_sub(1));
    }

    // ===== EXPANSION =====

    /// Whether `id` currently shows its children.
    fn shows_children(&self, id: &str) -> bool {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .map_or_else(|| self.expanded.contains(id), |row| row.expanded)
    }

    pub fn toggle(&mut self, id: &str) {
        let open = !self.shows_children(id);
        self.set_expanded(id, open);
        debug!(topic = id, expanded = open, "toggled sidebar group");
    }

    /// Opens or closes `id`. Closing during a search also overrides the
    /// search's own expansion of that parent.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(id.to_string());
            self.collapsed.remove(id);
        } else {
            self.expanded.remove(id);
            if !self.query().trim().is_empty() {
                self.collapsed.insert(id.to_string());
            }
        }
        self.refresh();
    }

    /// Expands every ancestor of `id` and moves the cursor onto it.
    pub fn reveal(&mut self, id: &str) {
        let ancestors: Vec<String> = self
            .store
            .resolve(id)
            .ancestors
            .iter()
            .map(|node| node.id.clone())
            .collect();
        for ancestor in &ancestors {
            self.collapsed.remove(ancestor);
        }
        self.expanded.extend(ancestors);
        self.refresh();
        if let Some(index) = self.index_of(id) {
            self.list_state.select(Some(index));
        }
    }

    /// Activating a parent toggles it; activating a leaf selects it.
    pub fn activate(&mut self, index: usize) -> Vec<Effect> {
        let Some(row) = self.rows.get(index) else {
            return Vec::new();
        };
        self.list_state.select(Some(index));
        if row.has_children {
            let id = row.id.clone();
            self.toggle(&id);
            Vec::new()
        } else {
            vec![Effect::SelectTopic(row.id.clone())]
        }
    }

    /// Left arrow: collapse an expanded parent, otherwise jump to the parent row.
    pub fn collapse_or_ascend(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.has_children && row.expanded {
            let id = row.id.clone();
            self.set_expanded(&id, false);
            return;
        }
        let parent = self.store.resolve(&row.id).parent_id().map(str::to_string);
        if let Some(index) = parent.and_then(|id| self.index_of(&id)) {
            self.list_state.select(Some(index));
        }
    }
}

impl HasFocus for SidebarState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_search);
        builder.leaf_widget(&self.f_tree);
        builder.end(tag);
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

    fn state() -> SidebarState {
        let store = ContentStore::from_json_str(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"overview","title":"Overview","content":"Welcome"},
                {"id":"agency","title":"Agency Space","children":[
                    {"id":"users","title":"Managing Users","content":"x"},
                    {"id":"deep","title":"Deep","children":[{"id":"leaf","title":"Leaf","content":"x"}]}
                ]},
                {"id":"sub","title":"Subaccount Space","children":[
                    {"id":"team","title":"Team Chat","content":"x"}
                ]}
            ]}"#,
        )
        .expect("fixture");
        SidebarState::new(Arc::new(store))
    }

    fn ids(state: &SidebarState) -> Vec<&str> {
        state.rows().iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn activating_a_parent_only_toggles() {
        let mut st = state();
        let agency = st.index_of("agency").expect("agency row");
        assert!(st.activate(agency).is_empty());
        assert_eq!(ids(&st), vec!["overview", "agency", "sub", "team"]);
        assert!(st.activate(agency).is_empty());
        assert!(ids(&st).contains(&"users"));
    }

    #[test]
    fn activating_a_leaf_selects_the_topic() {
        let mut st = state();
        let team = st.index_of("team").expect("team row");
        assert_eq!(st.activate(team), vec![Effect::SelectTopic("team".into())]);
    }

    #[test]
    fn search_keeps_cursor_on_visible_rows() {
        let mut st = state();
        for c in "chat".chars() {
            st.insert_search_char(c);
        }
        assert_eq!(ids(&st), vec!["sub", "team"]);
        assert_eq!(st.selected_index(), Some(0));
        st.clear_search();
        assert_eq!(st.query(), "");
        assert!(ids(&st).len() > 2);
    }

    #[test]
    fn reveal_expands_collapsed_ancestors() {
        let mut st = state();
        assert!(!ids(&st).contains(&"leaf"));
        st.reveal("leaf");
        assert_eq!(st.selected_row().map(|row| row.id.as_str()), Some("leaf"));
        assert!(st.rows().iter().any(|row| row.id == "deep" && row.expanded));
    }

    #[test]
    fn left_arrow_collapses_then_ascends() {
        let mut st = state();
        st.reveal("users");
        st.collapse_or_ascend();
        assert_eq!(st.selected_row().map(|row| row.id.as_str()), Some("agency"));
        st.collapse_or_ascend();
        assert_eq!(ids(&st), vec!["overview", "agency", "sub", "team"]);
    }

    #[test]
    fn parent_held_open_by_a_search_can_still_be_collapsed() {
        let mut st = state();
        for c in "chat".chars() {
            st.insert_search_char(c);
        }
        assert_eq!(ids(&st), vec!["sub", "team"]);

        let sub = st.index_of("sub").expect("sub row");
        assert!(st.activate(sub).is_empty());
        assert_eq!(ids(&st), vec!["sub"]);
        assert!(!st.rows()[0].expanded);

        assert!(st.activate(sub).is_empty());
        assert_eq!(ids(&st), vec!["sub", "team"]);

        assert!(st.activate(sub).is_empty());
        st.search_backspace();
        assert_eq!(ids(&st), vec!["sub", "team"], "editing the query drops the override");
    }

    #[test]
    fn cursor_movement_is_clamped() {
        let mut st = state();
        st.move_selection(-3);
        assert_eq!(st.selected_index(), Some(0));
        st.move_selection(100);
        assert_eq!(st.selected_index(), Some(st.rows().len() - 1));
        st.select_first();
        assert_eq!(st.selected_index(), Some(0));
    }
}
