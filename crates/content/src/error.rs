use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a content document.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed YAML content: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported content file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error("unsupported content schema version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("topic with title '{title}' has an empty id")]
    EmptyId { title: String },
    #[error("duplicate topic id '{0}'")]
    DuplicateId(String),
    #[error("topic '{id}' uses unknown icon '{icon}'")]
    UnknownIcon { id: String, icon: String },
    #[error("topic '{0}' has both markdown content and structured fields")]
    MixedLeafContent(String),
    #[error("topic '{0}' has children and must not carry content, features, benefits, examples or steps")]
    ParentWithContent(String),
}
