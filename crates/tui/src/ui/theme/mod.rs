//! Theme styling for the TUI.
//!
//! Two palettes (Dracula and Nord) are mapped onto semantic roles. Widgets
//! should go through [`Theme`] and the helpers in [`theme_helpers`] instead
//! of hard-coding colors.

use docent_util::ThemeName;
use tracing::debug;

pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Instantiates the configured theme.
pub fn load(name: ThemeName) -> Box<dyn Theme> {
    let definition = catalog::resolve(name);
    debug!(theme = definition.label, "loading theme");
    definition.build()
}
