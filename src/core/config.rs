//! Configuration management for the LLM proxy server.
//!
//! All settings are read from environment variables (optionally via a `.env`
//! file loaded in `main`). The resulting [`ProxyConfig`] is immutable and is
//! passed explicitly into router construction at startup.

use anyhow::{Context, Result};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// OpenAI API key used for every upstream call
    pub openai_api_key: String,

    /// Optional assistant id; when set, requests are routed through the
    /// Assistants thread/run protocol instead of a single completion call
    pub assistant_id: Option<String>,

    /// Reserved for a future auth layer; loaded but not enforced
    pub public_access_key: Option<String>,

    /// Base URL of the upstream API
    pub api_base: String,

    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Request timeout in seconds for upstream calls
    pub request_timeout_secs: u64,

    /// Delay between run-status polls in assistant mode
    pub poll_interval: Duration,
}

fn default_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    300
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(1000)
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is required")?;

        let assistant_id = std::env::var("OAI_ASSISTANT_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let public_access_key = std::env::var("LLM_PROXY_PUBLIC_ACCESS_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        let api_base = std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| default_api_base());

        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());

        let port = match std::env::var("LLM_PROXY_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid LLM_PROXY_PORT value: {}", raw))?,
            Err(_) => default_port(),
        };

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(default_request_timeout);

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(default_poll_interval);

        Ok(Self {
            openai_api_key,
            assistant_id,
            public_access_key,
            api_base,
            host,
            port,
            request_timeout_secs,
            poll_interval,
        })
    }

    /// The single inbound route served by this proxy.
    ///
    /// Decided once from configuration: assistant mode exposes the
    /// assistant-scoped path, direct mode the plain completions path.
    pub fn forward_path(&self) -> String {
        match &self.assistant_id {
            Some(id) => format!("/v1/assistants/{}/messages", id),
            None => "/v1/chat/completions".to_string(),
        }
    }
}
