pub mod markdown_view;
pub mod scrollbar;
pub mod text_input;

pub use text_input::TextInputState;
