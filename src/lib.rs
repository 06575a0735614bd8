//! LLM Proxy - a dual-mode reverse proxy for the OpenAI chat API
//!
//! This library forwards chat-completion requests to OpenAI in one of two
//! configuration-selected modes:
//!
//! - **Direct mode**: a single passthrough call to `/v1/chat/completions`,
//!   returning the upstream body verbatim
//! - **Assistant mode**: a multi-step Assistants session (create thread,
//!   post message, start run, poll to completion, retrieve the reply),
//!   selected by configuring an assistant id
//!
//! # Architecture
//!
//! - [`core`]: configuration, error taxonomy, request-scoped logging context
//! - [`api`]: HTTP handlers, models, the upstream client, and the
//!   assistant-session state machine
//!
//! # Configuration
//!
//! The server requires `OPENAI_API_KEY`. Optional environment variables:
//! - `OAI_ASSISTANT_ID`: switch to assistant mode
//! - `LLM_PROXY_PORT`: server port (default: 8000)
//! - `HOST`: bind address (default: 0.0.0.0)
//! - `OPENAI_API_BASE`: upstream base URL (default: https://api.openai.com)
//! - `REQUEST_TIMEOUT_SECS`: upstream request timeout (default: 300)
//! - `POLL_INTERVAL_MS`: assistant run poll interval (default: 1000)
//! - `LLM_PROXY_PUBLIC_ACCESS_KEY`: reserved for a future auth layer

pub mod api;
pub mod core;

// Re-export commonly used types for convenience
pub use api::{build_router, AppState, AssistantResponse, ChatRequest, Message, OpenAiClient};
pub use core::{ProxyConfig, ProxyError, Result};
