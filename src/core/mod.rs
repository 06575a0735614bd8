//! Core functionality for the LLM proxy server.
//!
//! This module contains fundamental components used throughout the application:
//! - Configuration management
//! - Error handling
//! - Request-scoped logging context

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use logging::{generate_request_id, get_request_id, REQUEST_ID};
