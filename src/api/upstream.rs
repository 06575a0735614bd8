//! Typed wrappers over every upstream OpenAI call.
//!
//! [`OpenAiClient`] owns the credential and base URL and issues one method
//! per upstream endpoint. Any non-success response is converted into
//! [`ProxyError::Upstream`] carrying the status and body text verbatim;
//! transport failures bubble up through the `From<reqwest::Error>` impl.

use crate::api::models::{ChatRequest, MessageList, RunObject, ThreadObject};
use crate::core::{ProxyError, Result};
use bytes::Bytes;
use serde_json::json;

/// Beta opt-in header required by every Assistants endpoint.
const ASSISTANTS_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Upstream API client.
///
/// Wraps the process-wide pooled `reqwest::Client`; cloning is cheap and all
/// clones share the same connection pool, so each call borrows a connection
/// and returns it when the response body has been consumed.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Forward a chat request in a single passthrough call.
    ///
    /// On success the upstream body is returned as raw bytes so the caller
    /// can relay it without re-serializing.
    pub async fn chat_completions(&self, request: &ChatRequest) -> Result<Bytes> {
        let url = self.url("/v1/chat/completions");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        tracing::debug!(url = %url, "Chat completion forwarded");
        Ok(response.bytes().await?)
    }

    /// Create a new conversation thread with no initial content.
    pub async fn create_thread(&self) -> Result<ThreadObject> {
        let response = self
            .http
            .post(self.url("/v1/threads"))
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .json(&json!({}))
            .send()
            .await?;

        let thread: ThreadObject = ensure_success(response).await?.json().await?;
        tracing::debug!(thread_id = %thread.id, "Thread created");
        Ok(thread)
    }

    /// Post a user turn on an existing thread.
    pub async fn add_thread_message(&self, thread_id: &str, content: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url(&format!("/v1/threads/{}/messages", thread_id)))
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .json(&json!({
                "role": "user",
                "content": content
            }))
            .send()
            .await?;

        ensure_success(response).await?;
        tracing::debug!(thread_id = %thread_id, "Message posted to thread");
        Ok(())
    }

    /// Start a run on a thread, bound to the configured assistant.
    pub async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunObject> {
        let response = self
            .http
            .post(self.url(&format!("/v1/threads/{}/runs", thread_id)))
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .json(&json!({ "assistant_id": assistant_id }))
            .send()
            .await?;

        let run: RunObject = ensure_success(response).await?.json().await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run.id, "Run started");
        Ok(run)
    }

    /// Fetch the current status of a run.
    pub async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunObject> {
        let response = self
            .http
            .get(self.url(&format!("/v1/threads/{}/runs/{}", thread_id, run_id)))
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    /// List the messages stored on a thread, newest first.
    pub async fn list_thread_messages(&self, thread_id: &str) -> Result<MessageList> {
        let response = self
            .http
            .get(self.url(&format!("/v1/threads/{}/messages", thread_id)))
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}

/// Turn a non-success upstream response into [`ProxyError::Upstream`],
/// preserving the status code and body text verbatim.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "Upstream returned an error");
    Err(ProxyError::Upstream {
        status: status.as_u16(),
        body,
    })
}
