//! # Command Execution Layer
//!
//! This module translates the effects left over after [`App::apply_effects`]
//! into imperative commands ([`Cmd`]) and executes them. It is the boundary
//! where pure state management meets the network.
//!
//! ## Design
//! - [`Cmd`] is the effectful command type.
//! - [`from_effects`] translates state-driven [`Effect`]s into [`Cmd`]s.
//! - [`run_cmds`] spawns the background work and hands the join handles back
//!   to the runtime, which feeds each result in as a [`docent_types::Msg`].
//!
//! State updates stay pure; commands own the side effects.
//!
//! [`App::apply_effects`]: crate::app::App::apply_effects

use std::sync::Arc;

use docent_api::{ChatTransport, answer_for};
use docent_types::Effect;
use tokio::task::JoinHandle;
use tracing::debug;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Post a question to the chat webhook and wait for the answer.
    AskAssistant(String),
}

/// Background work started by [`run_cmds`].
#[derive(Default)]
pub struct CommandBatch {
    /// Chat requests in flight; each resolves to the assistant's reply text.
    pub pending: Vec<JoinHandle<String>>,
}

/// Convert application [`Effect`]s into [`Cmd`]s.
///
/// Effects the app already handled never reach this point; anything else
/// without a command is dropped.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::SendChat(question) => Some(Cmd::AskAssistant(question)),
            _ => None,
        })
        .collect()
}

/// Execute commands. Network calls run as tokio tasks whose handles are
/// returned for the runtime to poll.
pub fn run_cmds(transport: &Arc<dyn ChatTransport>, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        match command {
            Cmd::AskAssistant(question) => batch.pending.push(spawn_ask(Arc::clone(transport), question)),
        }
    }
    batch
}

fn spawn_ask(transport: Arc<dyn ChatTransport>, question: String) -> JoinHandle<String> {
    debug!(chars = question.len(), "spawning chat request");
    tokio::spawn(async move { answer_for(&*transport, &question).await })
}

#[cfg(test)]
mod tests {
    use docent_api::APOLOGY;
    use docent_types::{Msg, Sender};

    use super::*;
    use crate::app::tests::{EchoTransport, FailingTransport, test_app_with};

    #[test]
    fn only_chat_effects_become_commands() {
        let commands = from_effects(vec![
            Effect::Quit,
            Effect::SendChat("How do I invite a user?".into()),
            Effect::SelectTopic("users".into()),
        ]);
        assert_eq!(commands, vec![Cmd::AskAssistant("How do I invite a user?".into())]);
    }

    #[tokio::test]
    async fn ask_resolves_to_the_reply_text() {
        let transport: Arc<dyn ChatTransport> = Arc::new(EchoTransport);
        let mut batch = run_cmds(&transport, vec![Cmd::AskAssistant("hello".into())]);
        assert_eq!(batch.pending.len(), 1);
        let reply = batch.pending.remove(0).await.expect("join");
        assert_eq!(reply, "echo: hello");
    }

    #[tokio::test]
    async fn failed_send_ends_the_transcript_with_the_apology() {
        let mut app = test_app_with(Arc::new(FailingTransport));
        app.apply_effects(vec![Effect::ToggleChat]);
        for character in "Where are invoices?".chars() {
            app.chat.input.insert_char(character);
        }
        let question = app.chat.begin_send().expect("question to send");
        let remaining = app.apply_effects(vec![Effect::SendChat(question)]);
        let commands = from_effects(remaining);
        assert_eq!(commands, vec![Cmd::AskAssistant("Where are invoices?".into())]);

        let mut batch = run_cmds(&app.ctx.transport, commands);
        assert_eq!(batch.pending.len(), 1);
        let reply = batch.pending.remove(0).await.expect("join");
        app.update(&Msg::ChatReplied(reply));

        let transcript = app.chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[1].sender, Sender::Assistant);
        assert_eq!(transcript[1].text, APOLOGY);
        assert!(!app.chat.is_pending());
    }
}
