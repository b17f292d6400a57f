//! Shared message and effect definitions for the Docent TUI.
//!
//! Components never mutate cross-cutting state directly. They return
//! [`Effect`]s describing what should happen, and the runtime feeds
//! asynchronous results back in as [`Msg`]s.

use std::fmt;

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("You"),
            Self::Assistant => f.write_str("Assistant"),
        }
    }
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}

/// Messages that update application state.
///
/// These originate from the runtime (ticks, resizes) or from background
/// tasks completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick (loading indicator animation)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// The outstanding chat request resolved with the assistant's text
    ChatReplied(String),
}

/// Side effects requested by components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Change the active topic. This is the only path that mutates it.
    SelectTopic(String),
    /// Send a user question to the chat webhook
    SendChat(String),
    /// Open or close the chat panel
    ToggleChat,
    /// Show or hide the sidebar pane
    ToggleSidebar,
    /// Leave the application
    Quit,
}
