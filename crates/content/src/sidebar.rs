//! Pure sidebar model: filtering and the flattened row list.

use std::collections::HashSet;

use docent_util::contains_ignore_case;

use crate::{Icon, TopicNode};

/// A visible sidebar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub id: String,
    pub title: String,
    pub depth: usize,
    pub icon: Option<Icon>,
    pub has_children: bool,
    pub expanded: bool,
}

/// Ids of the parents expanded when the sidebar first appears: every
/// top-level group.
pub fn default_expanded(nodes: &[TopicNode]) -> HashSet<String> {
    nodes.iter().filter(|node| node.is_parent()).map(|node| node.id.clone()).collect()
}

/// Top-level topics whose title, or any descendant's title, contains
/// `query` (case-insensitive). An empty or blank query keeps everything.
pub fn filter_topics<'a>(nodes: &'a [TopicNode], query: &str) -> Vec<&'a TopicNode> {
    let query = query.trim();
    nodes.iter().filter(|node| subtree_matches(node, query)).collect()
}

fn subtree_matches(node: &TopicNode, query: &str) -> bool {
    contains_ignore_case(&node.title, query) || descendant_matches(node, query)
}

fn descendant_matches(node: &TopicNode, query: &str) -> bool {
    node.children().iter().any(|child| subtree_matches(child, query))
}

/// Flattens the filtered tree into display rows.
///
/// A parent's children are listed only when it is expanded. All children of
/// a visible parent are kept, not just the matching ones. While a query is
/// active, a parent that is visible only because of a descendant match is
/// treated as expanded unless its id is in `collapsed`.
pub fn sidebar_rows(
    nodes: &[TopicNode],
    expanded: &HashSet<String>,
    collapsed: &HashSet<String>,
    query: &str,
) -> Vec<SidebarRow> {
    let query = query.trim();
    let mut rows = Vec::new();
    for node in filter_topics(nodes, query) {
        push_rows(node, 0, expanded, collapsed, query, &mut rows);
    }
    rows
}

fn push_rows(
    node: &TopicNode,
    depth: usize,
    expanded: &HashSet<String>,
    collapsed: &HashSet<String>,
    query: &str,
    rows: &mut Vec<SidebarRow>,
) {
    let has_children = node.is_parent();
    let forced_open = !query.is_empty()
        && !collapsed.contains(&node.id)
        && !contains_ignore_case(&node.title, query)
        && descendant_matches(node, query);
    let is_expanded = has_children && (expanded.contains(&node.id) || forced_open);
    rows.push(SidebarRow {
        id: node.id.clone(),
        title: node.title.clone(),
        depth,
        icon: node.icon,
        has_children,
        expanded: is_expanded,
    });
    if is_expanded {
        for child in node.children() {
            push_rows(child, depth + 1, expanded, collapsed, query, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentStore;

    fn store() -> ContentStore {
        ContentStore::from_json_str(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"overview","title":"Overview","content":"Welcome"},
                {"id":"agency","title":"Agency Space","children":[
                    {"id":"subaccounts","title":"Creating Subaccounts","content":"x"},
                    {"id":"users","title":"Managing Users","content":"x"}
                ]},
                {"id":"sub","title":"Subaccount Space","children":[
                    {"id":"calendar","title":"Calendar","content":"x"},
                    {"id":"team","title":"Team Chat","content":"x"}
                ]}
            ]}"#,
        )
        .expect("fixture")
    }

    fn ids(rows: &[SidebarRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_whole_tree() {
        let store = store();
        assert_eq!(filter_topics(store.topics(), "").len(), 3);
        assert_eq!(filter_topics(store.topics(), "   ").len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let store = store();
        let hits = filter_topics(store.topics(), "over");
        assert_eq!(hits.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["overview"]);
    }

    #[test]
    fn parent_survives_when_a_child_matches() {
        let store = store();
        let hits = filter_topics(store.topics(), "CALENDAR");
        assert_eq!(hits.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["sub"]);
    }

    #[test]
    fn default_expansion_opens_top_level_groups() {
        let store = store();
        let expanded = default_expanded(store.topics());
        assert_eq!(expanded, HashSet::from(["agency".to_string(), "sub".to_string()]));
        let rows = sidebar_rows(store.topics(), &expanded, &HashSet::new(), "");
        assert_eq!(ids(&rows), vec!["overview", "agency", "subaccounts", "users", "sub", "calendar", "team"]);
        assert_eq!(rows[2].depth, 1);
    }

    #[test]
    fn collapsed_parent_hides_children() {
        let store = store();
        let expanded = HashSet::from(["sub".to_string()]);
        let rows = sidebar_rows(store.topics(), &expanded, &HashSet::new(), "");
        assert_eq!(ids(&rows), vec!["overview", "agency", "sub", "calendar", "team"]);
        assert!(!rows[1].expanded);
        assert!(rows[1].has_children);
    }

    #[test]
    fn child_match_forces_parent_open_and_keeps_siblings() {
        let store = store();
        let rows = sidebar_rows(store.topics(), &HashSet::new(), &HashSet::new(), "team");
        assert_eq!(ids(&rows), vec!["sub", "calendar", "team"]);
        assert!(rows[0].expanded);
    }

    #[test]
    fn own_title_match_respects_collapse_state() {
        let store = store();
        let rows = sidebar_rows(store.topics(), &HashSet::new(), &HashSet::new(), "agency");
        assert_eq!(ids(&rows), vec!["agency"]);
    }

    #[test]
    fn explicit_collapse_beats_a_forced_open_parent() {
        let store = store();
        let collapsed = HashSet::from(["sub".to_string()]);
        let rows = sidebar_rows(store.topics(), &HashSet::new(), &collapsed, "chat");
        assert_eq!(ids(&rows), vec!["sub"]);
        assert!(!rows[0].expanded);
        assert!(rows[0].has_children);
    }
}
