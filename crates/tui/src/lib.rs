//! # Docent TUI Library
//!
//! A terminal documentation browser: a searchable topic tree on the left,
//! the selected topic in the middle (with breadcrumbs), and an optional chat
//! panel that forwards questions to an assistant webhook.
//!
//! ## Architecture
//!
//! Each pane (sidebar, content, breadcrumbs, chat) is a separate component
//! that handles its own events and renders itself. Components report
//! cross-cutting changes as effects; [`app::App`] applies them, and the
//! command layer runs the chat requests in the background.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use docent_content::ContentStore;
use docent_util::DocentConfig;

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Terminal setup failures (raw mode, alternate screen) and an unusable
/// webhook client configuration.
pub async fn run(store: Arc<ContentStore>, config: DocentConfig) -> Result<()> {
    ui::runtime::run_app(store, config).await
}
