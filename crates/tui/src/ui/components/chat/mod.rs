pub mod chat_component;
pub mod state;

pub use chat_component::ChatComponent;
pub use state::ChatState;
