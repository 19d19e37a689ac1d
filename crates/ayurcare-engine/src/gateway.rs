//! Response gateway: the seam between a conversation and a remote model.
//!
//! A gateway receives the new user message plus the pre-submission history,
//! issues exactly one request and normalizes the outcome. It never touches
//! conversation state; the store mutates itself around the call.

use crate::message::{HistoryEntry, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Model-side role label for user turns.
pub const USER_ROLE: &str = "user";

/// Model-side role label for assistant turns.
pub const MODEL_ROLE: &str = "model";

/// A remote capability that turns a message plus history into a reply.
#[async_trait]
pub trait ResponseGateway: Send + Sync {
    /// Issue one request for `message` given the prior `history`.
    ///
    /// `Ok(None)` means the call succeeded without any reply text; callers
    /// substitute a fallback.
    async fn respond(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<Option<String>, GatewayError>;

    /// Short name for logs and the status bar.
    fn name(&self) -> &str;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl GenerationParams {
    /// The fixed parameters used for every exchange.
    pub const FIXED: Self = Self {
        temperature: 0.7,
        top_p: 0.8,
        top_k: 40,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::FIXED
    }
}

/// One text part of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One exchange unit passed to the remote model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A single-part turn.
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    pub fn joined_text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

impl TryFrom<&HistoryEntry> for Turn {
    type Error = SystemEntry;

    fn try_from(entry: &HistoryEntry) -> Result<Self, Self::Error> {
        let role = match entry.role {
            Role::User => USER_ROLE,
            Role::Assistant => MODEL_ROLE,
            Role::System => return Err(SystemEntry),
        };
        Ok(Self::text(role, entry.content.clone()))
    }
}

impl TryFrom<&Turn> for HistoryEntry {
    type Error = UnknownTurnRole;

    fn try_from(turn: &Turn) -> Result<Self, Self::Error> {
        let role = match turn.role.as_str() {
            USER_ROLE => Role::User,
            MODEL_ROLE => Role::Assistant,
            other => return Err(UnknownTurnRole(other.to_string())),
        };
        Ok(Self::new(role, turn.joined_text()))
    }
}

/// System entries have no turn representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("system entries are not forwarded as history")]
pub struct SystemEntry;

/// A turn carried a role label this client does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown turn role: {0}")]
pub struct UnknownTurnRole(pub String);

/// Build the ordered turn list: projected history, then the new message.
pub fn build_turns(message: &str, history: &[HistoryEntry]) -> Vec<Turn> {
    history
        .iter()
        .filter_map(|entry| Turn::try_from(entry).ok())
        .chain(std::iter::once(Turn::text(USER_ROLE, message)))
        .collect()
}

/// Any failure reaching or parsing the remote model.
///
/// Variants exist for diagnostics only; the conversation store treats all
/// of them as the same connectivity failure.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The remote returned a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No API key was configured.
    #[error("No API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    /// Failure reported by a non-HTTP gateway.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{project_history, Message};

    #[test]
    fn test_build_turns_maps_roles_and_appends_message() {
        let history = vec![
            HistoryEntry::new(Role::Assistant, "Namaste"),
            HistoryEntry::new(Role::User, "Hi"),
            HistoryEntry::new(Role::Assistant, "Hello again"),
        ];
        let turns = build_turns("What is Vata?", &history);

        let roles: Vec<&str> = turns.iter().map(|t| t.role.as_str()).collect();
        assert_eq!(roles, vec!["model", "user", "model", "user"]);
        assert_eq!(turns.last().unwrap().joined_text(), "What is Vata?");
    }

    #[test]
    fn test_build_turns_drops_system_entries() {
        let history = vec![
            HistoryEntry::new(Role::System, "secret"),
            HistoryEntry::new(Role::User, "Hi"),
        ];
        let turns = build_turns("next", &history);
        assert_eq!(turns.len(), 2);
        assert!(turns.iter().all(|t| t.joined_text() != "secret"));
    }

    #[test]
    fn test_build_turns_with_empty_history() {
        let turns = build_turns("hello", &[]);
        assert_eq!(turns, vec![Turn::text("user", "hello")]);
    }

    #[test]
    fn test_history_round_trip_preserves_non_system_entries() {
        let log = vec![
            Message::assistant("Namaste"),
            Message::user("What is Kapha?"),
            Message::system("hidden"),
            Message::assistant("Kapha relates to earth and water."),
            Message::user("Thanks"),
        ];
        let history = project_history(&log);

        let back: Vec<HistoryEntry> = history
            .iter()
            .filter_map(|entry| Turn::try_from(entry).ok())
            .map(|turn| HistoryEntry::try_from(&turn).unwrap())
            .collect();

        let expected: Vec<HistoryEntry> = history
            .into_iter()
            .filter(|entry| entry.role != Role::System)
            .collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_unknown_turn_role_is_rejected() {
        let turn = Turn::text("function", "{}");
        let err = HistoryEntry::try_from(&turn).unwrap_err();
        assert_eq!(err, UnknownTurnRole("function".into()));
    }

    #[test]
    fn test_fixed_generation_params() {
        let params = GenerationParams::default();
        assert_eq!(params, GenerationParams::FIXED);
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
        assert!((params.top_p - 0.8).abs() < f64::EPSILON);
        assert_eq!(params.top_k, 40);
    }
}
