//! What the content pane shows for a resolution.

use docent_util::truncate_to_width;

use crate::markdown::{Block, Heading, extract_headings, first_paragraph, parse_blocks};
use crate::{LeafContent, NodeKind, Resolution, Step, TopicNode};

/// Call to action shown when no topic is active.
pub const EMPTY_STATE_TEXT: &str = "Choose a topic from the sidebar";

/// Display columns kept in a card excerpt.
pub const CARD_EXCERPT_WIDTH: usize = 120;

/// Summary of a child topic on its parent's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub excerpt: String,
}

impl Card {
    fn for_node(node: &TopicNode) -> Self {
        let excerpt = match &node.kind {
            NodeKind::Leaf(LeafContent::Structured(structured)) => structured.description.clone(),
            NodeKind::Leaf(LeafContent::Markdown(body)) => first_paragraph(body),
            NodeKind::Parent { summary, .. } => summary.clone(),
        }
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| match node.children().len() {
            0 => String::new(),
            1 => "1 topic".to_string(),
            n => format!("{n} topics"),
        });
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            excerpt: truncate_to_width(&excerpt, CARD_EXCERPT_WIDTH),
        }
    }
}

/// A titled list inside a structured leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Description(String),
    Features(Vec<String>),
    Benefits(Vec<String>),
    Examples(Vec<String>),
    Steps(Vec<Step>),
}

impl Section {
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Section::Description(_) => None,
            Section::Features(_) => Some("Features"),
            Section::Benefits(_) => Some("Benefits"),
            Section::Examples(_) => Some("Examples"),
            Section::Steps(_) => Some("Steps"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    Empty,
    Cards {
        title: String,
        description: Option<String>,
        cards: Vec<Card>,
    },
    /// Sections always appear in the order description, features,
    /// benefits, examples, steps. Empty ones are left out.
    Structured { title: String, sections: Vec<Section> },
    Markdown {
        title: String,
        blocks: Vec<Block>,
        toc: Vec<Heading>,
    },
}

impl ContentView {
    pub fn from_resolution(resolution: &Resolution<'_>) -> Self {
        match resolution.node {
            Some(node) => Self::for_node(node),
            None => ContentView::Empty,
        }
    }

    pub fn for_node(node: &TopicNode) -> Self {
        let title = node.title.clone();
        match &node.kind {
            NodeKind::Parent { summary, children } => ContentView::Cards {
                title,
                description: summary.clone(),
                cards: children.iter().map(Card::for_node).collect(),
            },
            NodeKind::Leaf(LeafContent::Markdown(body)) => ContentView::Markdown {
                title,
                blocks: parse_blocks(body),
                toc: extract_headings(body),
            },
            NodeKind::Leaf(LeafContent::Structured(structured)) => {
                let mut sections = Vec::new();
                if let Some(description) = structured.description.as_ref().filter(|d| !d.trim().is_empty()) {
                    sections.push(Section::Description(description.clone()));
                }
                if !structured.features.is_empty() {
                    sections.push(Section::Features(structured.features.clone()));
                }
                if !structured.benefits.is_empty() {
                    sections.push(Section::Benefits(structured.benefits.clone()));
                }
                if !structured.examples.is_empty() {
                    sections.push(Section::Examples(structured.examples.clone()));
                }
                if !structured.steps.is_empty() {
                    sections.push(Section::Steps(structured.steps.clone()));
                }
                ContentView::Structured { title, sections }
            }
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ContentView::Empty => None,
            ContentView::Cards { title, .. }
            | ContentView::Structured { title, .. }
            | ContentView::Markdown { title, .. } => Some(title),
        }
    }
}
