//! Conversation store: the single owner of session chat state.
//!
//! The store holds the ordered message log and the Idle/Pending gate. It is
//! the only mutator of conversation state. A submission is accepted only
//! while Idle, so at most one gateway request is ever outstanding; extra
//! submissions are dropped, not queued.

use crate::gateway::{GatewayError, ResponseGateway};
use crate::message::{project_history, HistoryEntry, Message};
use tracing::{debug, warn};

/// Seed assistant message shown when a session starts.
pub const GREETING: &str = "Namaste! 🙏 I am your AyurCare Assistant. How can I guide your wellness journey today? Whether you have questions about Doshas, therapies like Shirodhara, or need help booking a session, I am here to help.";

/// Substituted when the model answers successfully but without text.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't process that request. Let's try talking about something else wellness-related.";

/// Shown for any gateway failure.
pub const CONNECTIVITY_ERROR: &str =
    "I'm having trouble connecting right now. Please try again later.";

/// Submission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding; submissions are accepted.
    #[default]
    Idle,
    /// A request is in flight; submissions are dropped.
    Pending,
}

/// The gateway call an accepted submission asks the caller to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Raw text of the new user message.
    pub message: String,
    /// History as it was before the user message was appended.
    pub history: Vec<HistoryEntry>,
}

/// Ordered message log plus the in-flight gate.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    phase: Phase,
}

impl ConversationStore {
    /// Create an empty, idle store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the assistant greeting.
    pub fn with_greeting() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            phase: Phase::Idle,
        }
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current gate state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a gateway call is outstanding.
    pub fn is_awaiting_response(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Accept a user submission.
    ///
    /// Returns `None` (and changes nothing) for blank text or while a
    /// request is pending. Otherwise appends the user message, moves to
    /// Pending and returns the call to issue.
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }
        if self.is_awaiting_response() {
            debug!("Ignoring submission while a response is pending");
            return None;
        }

        let history = project_history(&self.messages);
        self.messages.push(Message::user(text));
        self.phase = Phase::Pending;

        Some(PendingTurn {
            message: text.to_string(),
            history,
        })
    }

    /// Record a successful reply; empty or missing text becomes the fallback.
    pub fn on_response_success(&mut self, reply: Option<String>) {
        if !self.is_awaiting_response() {
            debug!("Dropping reply with no request pending");
            return;
        }
        let content = reply
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
        self.messages.push(Message::assistant(content));
        self.phase = Phase::Idle;
    }

    /// Record a failed call as the fixed connectivity error.
    pub fn on_response_failure(&mut self) {
        if !self.is_awaiting_response() {
            debug!("Dropping failure with no request pending");
            return;
        }
        self.messages.push(Message::assistant(CONNECTIVITY_ERROR));
        self.phase = Phase::Idle;
    }

    /// Route a gateway outcome to the success or failure path.
    pub fn settle(&mut self, outcome: Result<Option<String>, GatewayError>) {
        match outcome {
            Ok(reply) => self.on_response_success(reply),
            Err(e) => {
                warn!(error = %e, "Gateway call failed");
                self.on_response_failure();
            }
        }
    }

    /// Run a full exchange: submit, await the gateway, settle.
    ///
    /// Returns whether the text was accepted.
    pub async fn send(&mut self, text: &str, gateway: &dyn ResponseGateway) -> bool {
        let Some(turn) = self.submit(text) else {
            return false;
        };
        debug!(gateway = gateway.name(), history_len = turn.history.len(), "Issuing request");
        let outcome = gateway.respond(&turn.message, &turn.history).await;
        self.settle(outcome);
        true
    }
}
