//! API layer for the LLM proxy server.
//!
//! This module contains the HTTP handlers, request/response models, the
//! upstream client, and the assistant-session state machine.

pub mod assistant;
pub mod handlers;
pub mod models;
pub mod upstream;

// Re-export commonly used types
pub use handlers::{build_router, chat_forward, health, AppState};
pub use models::{AssistantResponse, ChatRequest, Message};
pub use upstream::OpenAiClient;
