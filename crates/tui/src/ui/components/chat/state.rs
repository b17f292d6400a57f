use docent_types::ChatTurn;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::components::common::TextInputState;

/// Shown in place of the transcript while it is empty.
pub const GREETING: &str = "Ask me a question about the documentation!";

/// Label of the loading indicator; dots are appended while it animates.
pub const LOADING_LABEL: &str = "Searching";

/// Chat panel state.
///
/// At most one request is outstanding: [`ChatState::begin_send`] refuses to
/// start another until [`ChatState::complete`] has run.
#[derive(Debug)]
pub struct ChatState {
    pub open: bool,
    transcript: Vec<ChatTurn>,
    pub input: TextInputState,
    pending: bool,
    /// Loading animation frame
    dots: usize,
    /// Lines scrolled up from the newest turn
    pub scroll_back: u16,

    pub container_focus: FocusFlag,
    pub f_input: FocusFlag,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            open: false,
            transcript: Vec::new(),
            input: TextInputState::new(),
            pending: false,
            dots: 0,
            scroll_back: 0,
            container_focus: FocusFlag::named("docent.chat"),
            f_input: FocusFlag::named("docent.chat.input"),
        }
    }
}

impl ChatState {
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Appends the user's turn and returns the question to send, or `None`
    /// when a request is already in flight or the input is blank.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.pending || self.input.is_blank() {
            return None;
        }
        let question = self.input.take().trim().to_string();
        debug!(chars = question.len(), "sending chat question");
        self.transcript.push(ChatTurn::user(question.clone()));
        self.pending = true;
        self.dots = 0;
        self.scroll_back = 0;
        Some(question)
    }

    /// Appends the assistant's reply and leaves the loading state.
    pub fn complete(&mut self, reply: String) {
        self.transcript.push(ChatTurn::assistant(reply));
        self.pending = false;
        self.scroll_back = 0;
    }

    /// Advances the loading animation. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.dots = (self.dots + 1) % 4;
        true
    }

    /// `Searching` followed by zero to three dots.
    pub fn loading_text(&self) -> String {
        format!("{LOADING_LABEL}{}", ".".repeat(self.dots))
    }
}

impl HasFocus for ChatState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_input);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
