//! ayurcare-engine: Headless core of the AyurCare wellness assistant
//!
//! This crate provides everything below the user interface:
//! - The message model and the conversation store that owns chat state
//! - The response gateway seam and its Gemini implementation
//! - Static therapy and quick-action catalogs
//! - Configuration loading and API key resolution

pub mod catalog;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod gemini;
pub mod message;

// Re-export commonly used types
pub use catalog::{
    QuickAction, QuickActionKind, Therapy, TherapyCategory, DISCLAIMER, QUICK_ACTIONS,
    SYSTEM_PROMPT, THERAPIES,
};
pub use config::{Config, ConfigError};
pub use conversation::{
    ConversationStore, PendingTurn, Phase, CONNECTIVITY_ERROR, EMPTY_REPLY_FALLBACK, GREETING,
};
pub use gateway::{build_turns, GatewayError, GenerationParams, ResponseGateway, Turn};
pub use gemini::GeminiGateway;
pub use message::{project_history, HistoryEntry, Message, Role};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
