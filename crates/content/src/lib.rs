//! Documentation content for Docent.
//!
//! This crate owns the immutable documentation tree and every pure
//! computation over it: loading and validation, active-topic resolution,
//! breadcrumb trails, sidebar filtering, markdown blocks with their table of
//! contents, and the plain-markdown digest of the whole document.

mod digest;
pub mod error;
pub mod markdown;
pub mod model;
pub mod navigation;
pub mod sidebar;
pub mod store;
pub mod view;

pub use error::ContentError;
pub use markdown::{Block, Heading, Inline, ListItem, anchor_id, extract_headings, inline_text, parse_blocks};
pub use model::*;
pub use navigation::{BreadcrumbTrail, Crumb, HOME_LABEL, Resolution};
pub use sidebar::{SidebarRow, default_expanded, filter_topics, sidebar_rows};
pub use store::{ContentStore, EMBEDDED_DOCUMENT};
pub use view::{CARD_EXCERPT_WIDTH, Card, ContentView, EMPTY_STATE_TEXT, Section};
