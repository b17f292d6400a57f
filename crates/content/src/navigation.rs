//! Active-topic resolution and breadcrumb trails.

use crate::{ContentStore, TopicNode};

/// Label of the implicit first breadcrumb.
pub const HOME_LABEL: &str = "Home";

/// Outcome of looking up the active topic.
///
/// `node == None` is the ordinary "nothing selected" state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub node: Option<&'a TopicNode>,
    /// Ancestors from the root down to the node's parent.
    pub ancestors: Vec<&'a TopicNode>,
}

impl<'a> Resolution<'a> {
    pub fn absent() -> Self {
        Self {
            node: None,
            ancestors: Vec::new(),
        }
    }

    /// Nesting depth of the node (0 for top-level).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Id of the nearest ancestor, if any.
    pub fn parent_id(&self) -> Option<&'a str> {
        self.ancestors.last().map(|node| node.id.as_str())
    }

    pub fn breadcrumbs(&self, overview_id: &str) -> BreadcrumbTrail {
        BreadcrumbTrail::build(self, overview_id)
    }
}

impl ContentStore {
    /// Finds `id` anywhere in the tree and collects its ancestor chain.
    ///
    /// Pure depth-first walk; cheap enough to run on every render.
    pub fn resolve(&self, id: &str) -> Resolution<'_> {
        let mut ancestors = Vec::new();
        match find_in(self.topics(), id, &mut ancestors) {
            Some(node) => Resolution {
                node: Some(node),
                ancestors,
            },
            None => Resolution::absent(),
        }
    }
}

fn find_in<'a>(nodes: &'a [TopicNode], id: &str, ancestors: &mut Vec<&'a TopicNode>) -> Option<&'a TopicNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        ancestors.push(node);
        if let Some(found) = find_in(node.children(), id, ancestors) {
            return Some(found);
        }
        ancestors.pop();
    }
    None
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    /// Topic to navigate to; `None` for the current page.
    pub target: Option<String>,
    pub current: bool,
}

impl Crumb {
    fn link(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target.into()),
            current: false,
        }
    }

    fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: None,
            current: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbTrail {
    pub crumbs: Vec<Crumb>,
}

impl BreadcrumbTrail {
    /// `Home`, then each ancestor as a link, then the current node as plain text.
    pub fn build(resolution: &Resolution<'_>, overview_id: &str) -> Self {
        let Some(node) = resolution.node else {
            return Self {
                crumbs: vec![Crumb::link(HOME_LABEL, overview_id)],
            };
        };
        if node.id == overview_id {
            return Self {
                crumbs: vec![Crumb::current(HOME_LABEL)],
            };
        }

        let mut crumbs = Vec::with_capacity(resolution.ancestors.len() + 2);
        crumbs.push(Crumb::link(HOME_LABEL, overview_id));
        crumbs.extend(resolution.ancestors.iter().map(|ancestor| Crumb::link(&ancestor.title, &ancestor.id)));
        crumbs.push(Crumb::current(&node.title));
        Self { crumbs }
    }

    /// Navigation targets of every clickable crumb, in order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.crumbs.iter().filter_map(|crumb| crumb.target.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContentStore {
        ContentStore::from_json_str(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"overview","title":"Overview","content":"Welcome"},
                {"id":"agency","title":"Agency Space","children":[
                    {"id":"agency-users","title":"Managing Users","content":"Users"},
                    {"id":"billing","title":"Billing","children":[
                        {"id":"invoices","title":"Invoices","content":"Invoices"}
                    ]}
                ]}
            ]}"#,
        )
        .expect("fixture")
    }

    #[test]
    fn resolves_every_id_to_itself() {
        let store = store();
        for id in store.ids() {
            let resolution = store.resolve(id);
            assert_eq!(resolution.node.map(|n| n.id.as_str()), Some(id));
        }
    }

    #[test]
    fn ancestors_follow_nesting_depth() {
        let store = store();
        assert_eq!(store.resolve("overview").depth(), 0);
        assert_eq!(store.resolve("agency-users").depth(), 1);
        let deep = store.resolve("invoices");
        let chain: Vec<_> = deep.ancestors.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(chain, vec!["agency", "billing"]);
        assert_eq!(deep.parent_id(), Some("billing"));
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = store();
        assert_eq!(store.resolve("nope"), Resolution::absent());
        assert_eq!(store.resolve(""), Resolution::absent());
    }

    #[test]
    fn trail_links_ancestors_and_marks_current() {
        let store = store();
        let trail = store.resolve("invoices").breadcrumbs("overview");
        let labels: Vec<_> = trail.crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "Agency Space", "Billing", "Invoices"]);
        assert_eq!(trail.links().collect::<Vec<_>>(), vec!["overview", "agency", "billing"]);
        let last = trail.crumbs.last().expect("current crumb");
        assert!(last.current);
        assert!(last.target.is_none());
        assert_eq!(trail.crumbs.iter().filter(|c| c.current).count(), 1);
    }

    #[test]
    fn overview_trail_is_home_only() {
        let store = store();
        let trail = store.resolve("overview").breadcrumbs("overview");
        assert_eq!(trail.crumbs, vec![Crumb::current(HOME_LABEL)]);
    }

    #[test]
    fn absent_trail_offers_home() {
        let trail = Resolution::absent().breadcrumbs("overview");
        assert_eq!(trail.crumbs, vec![Crumb::link(HOME_LABEL, "overview")]);
    }
}
