//! Content document schema and the validated topic tree.
//!
//! The on-disk shape ([`RawDocument`]) is deliberately loose so authors can
//! write it by hand. Loading converts it into [`TopicNode`]s whose kind is
//! decided exactly once: a node is either a parent with children or a leaf
//! with markdown or structured content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Schema version this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Topic id used for the Home breadcrumb when a document names none.
pub const DEFAULT_OVERVIEW_ID: &str = "overview";

fn default_overview_id() -> String {
    DEFAULT_OVERVIEW_ID.to_string()
}

/// Top-level content document as written by authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub version: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default = "default_overview_id")]
    pub overview_id: String,
    pub navigation: Vec<RawTopic>,
}

/// One entry of the `navigation` tree before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTopic {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawTopic>,
}

impl RawTopic {
    pub(crate) fn has_structured_lists(&self) -> bool {
        !self.features.is_empty() || !self.benefits.is_empty() || !self.examples.is_empty() || !self.steps.is_empty()
    }
}

/// A numbered instruction, optionally illustrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Icons a topic may reference. Anything else is rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Book,
    Building,
    Users,
    Help,
    Settings,
    Calendar,
    Message,
    Chart,
    File,
    Zap,
}

impl Icon {
    pub const ALL: [Icon; 10] = [
        Icon::Book,
        Icon::Building,
        Icon::Users,
        Icon::Help,
        Icon::Settings,
        Icon::Calendar,
        Icon::Message,
        Icon::Chart,
        Icon::File,
        Icon::Zap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Book => "book",
            Icon::Building => "building",
            Icon::Users => "users",
            Icon::Help => "help",
            Icon::Settings => "settings",
            Icon::Calendar => "calendar",
            Icon::Message => "message",
            Icon::Chart => "chart",
            Icon::File => "file",
            Icon::Zap => "zap",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Icon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Icon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Fields of a leaf rendered as fixed sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredContent {
    pub description: Option<String>,
    pub features: Vec<String>,
    pub benefits: Vec<String>,
    pub examples: Vec<String>,
    pub steps: Vec<Step>,
}

/// What a leaf displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafContent {
    Markdown(String),
    Structured(StructuredContent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Parent {
        /// Short text shown on the parent's own page above the cards.
        summary: Option<String>,
        children: Vec<TopicNode>,
    },
    Leaf(LeafContent),
}

/// Validated node of the documentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNode {
    pub id: String,
    pub title: String,
    pub icon: Option<Icon>,
    pub kind: NodeKind,
}

impl TopicNode {
    /// Child nodes in display order; empty for leaves.
    pub fn children(&self) -> &[TopicNode] {
        match &self.kind {
            NodeKind::Parent { children, .. } => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self.kind, NodeKind::Parent { .. })
    }

    /// Description of a structured leaf or the summary of a parent.
    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Parent { summary, .. } => summary.as_deref(),
            NodeKind::Leaf(LeafContent::Structured(structured)) => structured.description.as_deref(),
            NodeKind::Leaf(LeafContent::Markdown(_)) => None,
        }
    }

    /// Markdown body, when this is a markdown leaf.
    pub fn markdown(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(LeafContent::Markdown(body)) => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_names_parse_case_insensitively() {
        assert_eq!("Building".parse::<Icon>(), Ok(Icon::Building));
        assert_eq!(" zap ".parse::<Icon>(), Ok(Icon::Zap));
        assert_eq!("rocket".parse::<Icon>(), Err("rocket".to_string()));
        for icon in Icon::ALL {
            assert_eq!(icon.as_str().parse::<Icon>(), Ok(icon));
        }
    }

    #[test]
    fn raw_document_defaults_overview_id() {
        let doc: RawDocument =
            serde_json::from_str(r#"{"version":1,"title":"Docs","navigation":[]}"#).expect("parse");
        assert_eq!(doc.overview_id, DEFAULT_OVERVIEW_ID);
        assert!(doc.subtitle.is_none());
    }
}
