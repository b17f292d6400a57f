//! Loading, validation and lookup of the documentation tree.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    ContentError, Icon, LeafContent, NodeKind, RawDocument, RawTopic, SCHEMA_VERSION, StructuredContent, TopicNode,
};

/// Document compiled into the binary and used when no path is configured.
pub const EMBEDDED_DOCUMENT: &str = include_str!("../data/docs.json");

/// Immutable documentation tree plus an id index.
///
/// Built once at startup; callers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pub title: String,
    pub subtitle: Option<String>,
    pub overview_id: String,
    topics: Vec<TopicNode>,
    /// Child-index path from the roots to each node, in tree order.
    index: IndexMap<String, Vec<usize>>,
}

impl ContentStore {
    /// Loads the document bundled with the binary.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json_str(EMBEDDED_DOCUMENT)
    }

    /// Loads a document from disk, picking the parser by file extension.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = match extension.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            _ => return Err(ContentError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), topics = store.len(), "loaded content document");
        Ok(store)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ContentError> {
        let document: RawDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ContentError> {
        let document: RawDocument = serde_yaml::from_str(text)?;
        Self::from_document(document)
    }

    /// Validates a parsed document and builds the id index.
    pub fn from_document(document: RawDocument) -> Result<Self, ContentError> {
        if document.version != SCHEMA_VERSION {
            return Err(ContentError::UnsupportedVersion {
                found: document.version,
                supported: SCHEMA_VERSION,
            });
        }

        let mut seen = HashSet::new();
        let topics = document
            .navigation
            .into_iter()
            .map(|raw| convert_topic(raw, &mut seen))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = IndexMap::new();
        build_index(&topics, &mut Vec::new(), &mut index);

        if !index.contains_key(&document.overview_id) {
            warn!(overview_id = %document.overview_id, "overview topic not found; Home will show the empty state");
        }
        debug!(topics = index.len(), "content index built");

        Ok(Self {
            title: document.title,
            subtitle: document.subtitle,
            overview_id: document.overview_id,
            topics,
            index,
        })
    }

    /// Top-level topics in display order.
    pub fn topics(&self) -> &[TopicNode] {
        &self.topics
    }

    /// Number of topics at every depth.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TopicNode> {
        let path = self.index.get(id)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.topics.get(*first)?;
        for position in rest {
            node = node.children().get(*position)?;
        }
        Some(node)
    }

    /// Every topic id in tree order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }
}

fn convert_topic(raw: RawTopic, seen: &mut HashSet<String>) -> Result<TopicNode, ContentError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(ContentError::EmptyId { title: raw.title });
    }
    if !seen.insert(id.clone()) {
        return Err(ContentError::DuplicateId(id));
    }

    let icon = match raw.icon.as_deref() {
        Some(name) => Some(name.parse::<Icon>().map_err(|icon| ContentError::UnknownIcon { id: id.clone(), icon })?),
        None => None,
    };

    let has_structured = raw.has_structured_lists();
    let kind = if !raw.children.is_empty() {
        if raw.content.is_some() || has_structured {
            return Err(ContentError::ParentWithContent(id));
        }
        let children = raw
            .children
            .into_iter()
            .map(|child| convert_topic(child, seen))
            .collect::<Result<Vec<_>, _>>()?;
        NodeKind::Parent {
            summary: raw.description,
            children,
        }
    } else if let Some(body) = raw.content {
        if has_structured || raw.description.is_some() {
            return Err(ContentError::MixedLeafContent(id));
        }
        NodeKind::Leaf(LeafContent::Markdown(body))
    } else {
        NodeKind::Leaf(LeafContent::Structured(StructuredContent {
            description: raw.description,
            features: raw.features,
            benefits: raw.benefits,
            examples: raw.examples,
            steps: raw.steps,
        }))
    };

    Ok(TopicNode {
        id,
        title: raw.title,
        icon,
        kind,
    })
}

fn build_index(nodes: &[TopicNode], path: &mut Vec<usize>, index: &mut IndexMap<String, Vec<usize>>) {
    for (position, node) in nodes.iter().enumerate() {
        path.push(position);
        index.insert(node.id.clone(), path.clone());
        build_index(node.children(), path, index);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> Result<ContentStore, ContentError> {
        ContentStore::from_json_str(json)
    }

    #[test]
    fn embedded_document_loads() {
        let store = ContentStore::embedded().expect("embedded document is valid");
        assert!(!store.is_empty());
        assert!(store.contains(&store.overview_id));
    }

    #[test]
    fn node_kind_is_decided_at_load() {
        let store = load(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"group","title":"Group","description":"Grouped topics","children":[
                    {"id":"md","title":"Markdown","content":"Hello"},
                    {"id":"st","title":"Structured","description":"d","features":["a"]}
                ]}
            ]}"#,
        )
        .expect("load");

        let group = store.get("group").expect("group");
        assert!(group.is_parent());
        assert_eq!(group.description(), Some("Grouped topics"));
        assert_eq!(store.get("md").and_then(TopicNode::markdown), Some("Hello"));
        match &store.get("st").expect("st").kind {
            NodeKind::Leaf(LeafContent::Structured(s)) => assert_eq!(s.features, vec!["a".to_string()]),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn index_preserves_tree_order() {
        let store = load(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"a","title":"A","children":[{"id":"a1","title":"A1"},{"id":"a2","title":"A2"}]},
                {"id":"b","title":"B"}
            ]}"#,
        )
        .expect("load");
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["a", "a1", "a2", "b"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn rejects_duplicate_ids_across_levels() {
        let err = load(
            r#"{"version":1,"title":"T","navigation":[
                {"id":"a","title":"A","children":[{"id":"b","title":"B"}]},
                {"id":"b","title":"B again"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId(id) if id == "b"));
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(matches!(
            load(r#"{"version":2,"title":"T","navigation":[]}"#),
            Err(ContentError::UnsupportedVersion { found: 2, .. })
        ));
        assert!(matches!(
            load(r#"{"version":1,"title":"T","navigation":[{"id":"  ","title":"Blank"}]}"#),
            Err(ContentError::EmptyId { .. })
        ));
        assert!(matches!(
            load(r#"{"version":1,"title":"T","navigation":[{"id":"a","title":"A","icon":"rocket"}]}"#),
            Err(ContentError::UnknownIcon { icon, .. }) if icon == "rocket"
        ));
        assert!(matches!(
            load(r#"{"version":1,"title":"T","navigation":[{"id":"a","title":"A","content":"x","features":["f"]}]}"#),
            Err(ContentError::MixedLeafContent(_))
        ));
        assert!(matches!(
            load(
                r#"{"version":1,"title":"T","navigation":[{"id":"a","title":"A","content":"x","children":[{"id":"b","title":"B"}]}]}"#
            ),
            Err(ContentError::ParentWithContent(_))
        ));
        assert!(matches!(load("{not json"), Err(ContentError::Json(_))));
    }

    #[test]
    fn loads_yaml_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docs.yaml");
        std::fs::write(
            &path,
            "version: 1\ntitle: Docs\nnavigation:\n  - id: overview\n    title: Overview\n    content: \"# Hi\"\n",
        )
        .expect("write");
        let store = ContentStore::from_path(&path).expect("load yaml");
        assert_eq!(store.get("overview").and_then(TopicNode::markdown), Some("# Hi"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docs.toml");
        std::fs::write(&path, "").expect("write");
        assert!(matches!(ContentStore::from_path(&path), Err(ContentError::UnsupportedFormat(_))));
    }
}
