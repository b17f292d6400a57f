pub mod content_component;
pub mod state;

pub use content_component::ContentComponent;
pub use state::ContentState;
