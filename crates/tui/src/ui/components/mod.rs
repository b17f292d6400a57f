//! UI components: sidebar, content, breadcrumbs, chat.

pub mod breadcrumbs;
pub mod chat;
pub mod common;
pub mod component;
pub mod content;
pub mod sidebar;

pub use breadcrumbs::BreadcrumbsComponent;
pub use chat::ChatComponent;
pub use component::*;
pub use content::ContentComponent;
pub use sidebar::SidebarComponent;
