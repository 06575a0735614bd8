//! API request and response models.
//!
//! Defines the inbound chat request shape plus the data structures exchanged
//! with the upstream Assistants API (threads, runs, thread messages).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

/// Inbound chat request.
///
/// `messages` is required; a body without it is rejected during extraction.
/// The optional fields fall back to the same defaults in both forwarding
/// modes, so the serialized body sent upstream always carries them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages (must be non-empty, checked by the handler)
    pub messages: Vec<Message>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl ChatRequest {
    /// Content of the final turn in the conversation.
    ///
    /// Assistant mode forwards only this turn, not the full history.
    /// Returns `None` when `messages` is empty; the handler rejects that
    /// case before any forwarding starts.
    pub fn last_message_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}

/// Envelope returned by assistant mode, wrapping the raw content blocks of
/// the selected assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub assistant_response: Value,
}

/// Upstream thread object (only the id is consumed).
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadObject {
    pub id: String,
}

/// Upstream run object.
///
/// `status` is an opaque upstream enum; only a handful of values are
/// interpreted and everything else keeps the poll loop going.
#[derive(Debug, Clone, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub status: String,
}

/// A message stored on an upstream thread.
///
/// `content` is kept as raw JSON content blocks and never reshaped.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub role: String,
    pub content: Value,
}

/// Paginated list of thread messages (only `data` is consumed).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}
