//! Client-side state for one chat session.
//!
//! The view owns the turn list and moves between two states:
//!
//! ```text
//! Idle --submit--> Sending --complete(Ok | Err)--> Idle
//! ```
//!
//! A submit while `Sending` is ignored, as is a blank submit. There is no
//! queueing, cancellation or client-side timeout: if the transport never
//! resolves the view stays `Sending`.
//!
//! The view is event driven. Front ends either call [`ConversationView::submit`]
//! and later [`ConversationView::complete`] themselves, or let
//! [`ConversationView::send`] drive a [`ChatTransport`].

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::render::{Rendered, render_turn};
use crate::turn::Turn;

/// Local greeting shown when a session starts. Never sent to the backend.
pub const GREETING: &str =
    "Hi, I'm Barbella, your personal fitness and wellness assistant. How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Accepting input.
    Idle,
    /// A request is in flight; input is disabled.
    Sending,
}

/// Failures reported by a [`ChatTransport`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),
}

/// Delivers the turn list to the chat endpoint and returns the reply text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_turns(&self, turns: &[Turn]) -> Result<String, TransportError>;
}

/// Result of [`ConversationView::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent: blank input or a request already in flight.
    Ignored,
    /// The reply was appended as an assistant turn.
    Replied,
    /// An error turn was appended.
    Failed,
}

/// In-memory conversation store scoped to one UI session.
#[derive(Debug, Clone)]
pub struct ConversationView {
    turns: Vec<Turn>,
    /// Number of leading turns that only exist locally (the greeting).
    local_prefix: usize,
    input: String,
    state: ViewState,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    /// New session seeded with the default greeting.
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
            local_prefix: 1,
            input: String::new(),
            state: ViewState::Idle,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending input. Ignored while a request is in flight.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.state == ViewState::Idle {
            self.input = text.into();
        }
    }

    /// Turns that are sent to the backend: everything but the local greeting.
    pub fn outbound_turns(&self) -> &[Turn] {
        &self.turns[self.local_prefix..]
    }

    /// Appends the pending input as a user turn and enters `Sending`.
    ///
    /// Returns the turn list to post, or `None` when the submit is ignored.
    pub fn submit(&mut self) -> Option<Vec<Turn>> {
        if self.state == ViewState::Sending || self.input.trim().is_empty() {
            return None;
        }

        let content = std::mem::take(&mut self.input);
        self.turns.push(Turn::user(content));
        self.state = ViewState::Sending;
        debug!(turns = self.turns.len(), "conversation view sending");

        Some(self.outbound_turns().to_vec())
    }

    /// Records the outcome of the in-flight request and returns to `Idle`.
    ///
    /// Ignored when no request is in flight.
    pub fn complete(&mut self, outcome: Result<String, TransportError>) {
        if self.state != ViewState::Sending {
            return;
        }

        let turn = match outcome {
            Ok(text) => Turn::assistant(text),
            Err(e) => {
                debug!(error = %e, "conversation view request failed");
                Turn::assistant(format!("Error: {e}. Please try again."))
            }
        };
        self.turns.push(turn);
        self.state = ViewState::Idle;
    }

    /// Submits the pending input through `transport` and records the reply.
    pub async fn send<T>(&mut self, transport: &T) -> SendOutcome
    where
        T: ChatTransport + ?Sized,
    {
        let Some(payload) = self.submit() else {
            return SendOutcome::Ignored;
        };

        let outcome = transport.post_turns(&payload).await;
        let sent = if outcome.is_ok() {
            SendOutcome::Replied
        } else {
            SendOutcome::Failed
        };
        self.complete(outcome);
        sent
    }

    /// Rendering decision for every turn, in order.
    pub fn rendered(&self) -> Vec<Rendered> {
        self.turns.iter().map(render_turn).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::turn::Role;

    /// Transport that replays a fixed outcome and records each payload.
    struct StubTransport {
        outcome: Result<String, TransportError>,
        calls: Mutex<Vec<Vec<Turn>>>,
    }

    impl StubTransport {
        fn new(outcome: Result<String, TransportError>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<Turn>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn post_turns(&self, turns: &[Turn]) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(turns.to_vec());
            self.outcome.clone()
        }
    }

    #[test]
    fn starts_idle_with_local_greeting() {
        let view = ConversationView::new();
        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(view.turns(), &[Turn::assistant(GREETING)]);
        assert!(view.outbound_turns().is_empty());
    }

    #[test]
    fn submit_appends_user_turn_and_clears_input() {
        let mut view = ConversationView::new();
        view.set_input("How many rest days?");

        let payload = view.submit().expect("payload");

        assert_eq!(payload, vec![Turn::user("How many rest days?")]);
        assert_eq!(view.state(), ViewState::Sending);
        assert_eq!(view.input(), "");
        assert_eq!(view.turns().len(), 2);
        assert_eq!(view.turns()[1].role, Role::User);
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut view = ConversationView::new();
        view.set_input("   \n\t");
        assert!(view.submit().is_none());
        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(view.turns().len(), 1);
    }

    #[test]
    fn submit_while_sending_is_ignored() {
        let mut view = ConversationView::new();
        view.set_input("first");
        view.submit().expect("payload");

        view.set_input("second");
        assert!(view.submit().is_none());
        assert_eq!(view.turns().len(), 2);
        assert_eq!(view.input(), "");
    }

    #[test]
    fn successful_reply_returns_to_idle() {
        let mut view = ConversationView::new();
        view.set_input("Hi");
        view.submit();
        view.complete(Ok("Hello there!".into()));

        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(view.turns().last(), Some(&Turn::assistant("Hello there!")));
    }

    #[test]
    fn failure_appends_error_turn() {
        let mut view = ConversationView::new();
        view.set_input("Hi");
        view.submit();
        view.complete(Err(TransportError::Status(500)));

        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(
            view.turns().last().unwrap().content,
            "Error: HTTP error! status: 500. Please try again."
        );
    }

    #[test]
    fn complete_while_idle_is_ignored() {
        let mut view = ConversationView::new();
        view.complete(Ok("stray".into()));
        assert_eq!(view.turns().len(), 1);
    }

    #[test]
    fn later_payloads_carry_full_history_without_greeting() {
        let mut view = ConversationView::new();
        view.set_input("one");
        view.submit();
        view.complete(Ok("reply one".into()));
        view.set_input("two");

        let payload = view.submit().expect("payload");
        assert_eq!(
            payload,
            vec![
                Turn::user("one"),
                Turn::assistant("reply one"),
                Turn::user("two"),
            ]
        );
        assert!(payload.last().unwrap().is_user());
    }

    #[test]
    fn rendered_uses_table_for_exercise_reply() {
        let mut view = ConversationView::new();
        view.set_input("leg day?");
        view.submit();
        view.complete(Ok("| Exercise | Sets | Reps |\n|---|---|---|\n| Squats | 3 | 10 |".into()));

        let rendered = view.rendered();
        assert!(matches!(rendered[0], Rendered::Markdown(_)));
        assert!(matches!(rendered[1], Rendered::Plain(_)));
        assert!(matches!(rendered[2], Rendered::Table(_)));
    }

    #[tokio::test]
    async fn send_posts_once_and_appends_reply() {
        let transport = StubTransport::new(Ok("Drink water.".into()));
        let mut view = ConversationView::new();
        view.set_input("Hydration tips?");

        assert_eq!(view.send(&transport).await, SendOutcome::Replied);
        assert_eq!(transport.calls(), vec![vec![Turn::user("Hydration tips?")]]);
        assert_eq!(view.turns().last(), Some(&Turn::assistant("Drink water.")));
    }

    #[tokio::test]
    async fn send_with_blank_input_issues_no_request() {
        let transport = StubTransport::new(Ok("unused".into()));
        let mut view = ConversationView::new();

        assert_eq!(view.send(&transport).await, SendOutcome::Ignored);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn send_failure_reports_network_message() {
        let transport = StubTransport::new(Err(TransportError::Network("connection refused".into())));
        let mut view = ConversationView::new();
        view.set_input("Hi");

        assert_eq!(view.send(&transport).await, SendOutcome::Failed);
        assert_eq!(
            view.turns().last().unwrap().content,
            "Error: connection refused. Please try again."
        );
        assert_eq!(view.state(), ViewState::Idle);
    }
}
