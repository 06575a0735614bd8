//! Assistant-session forwarding state machine.
//!
//! One inbound request in assistant mode drives a fresh upstream session
//! through a strict sequence of steps:
//!
//! ```text
//! CreatingThread -> PostingMessage -> StartingRun -> Polling -> Retrieving -> Done
//! ```
//!
//! Each state has exactly one transition function; any upstream failure
//! aborts the machine immediately through the `Err` arm of the transition's
//! result. Sessions are request-scoped: nothing is cached or shared across
//! requests, and each request polls on its own timer and attempt counter.

use crate::api::models::{AssistantResponse, ChatRequest};
use crate::api::upstream::OpenAiClient;
use crate::core::{ProxyError, Result};
use serde_json::Value;
use std::time::Duration;

/// Maximum number of run-status polls before the session times out.
pub const POLL_MAX_ATTEMPTS: u32 = 180;

/// Run statuses that end the session early instead of polling to the
/// timeout.
const TERMINAL_FAILURE_STATUSES: &[&str] = &["failed", "cancelled", "expired"];

const COMPLETED_STATUS: &str = "completed";

/// Session progress, tagged with the data each step carries forward.
#[derive(Debug)]
enum SessionState {
    CreatingThread,
    PostingMessage {
        thread_id: String,
    },
    StartingRun {
        thread_id: String,
    },
    Polling {
        thread_id: String,
        run_id: String,
        /// Number of poll calls already made
        attempts: u32,
    },
    Retrieving {
        thread_id: String,
    },
    Done(Value),
}

/// Drive one request through the full assistant session.
#[tracing::instrument(skip(client, request), fields(assistant_id = %assistant_id))]
pub async fn forward(
    client: &OpenAiClient,
    assistant_id: &str,
    request: &ChatRequest,
    poll_interval: Duration,
) -> Result<AssistantResponse> {
    let mut state = SessionState::CreatingThread;
    loop {
        state = match state {
            SessionState::CreatingThread => creating_thread(client).await?,
            SessionState::PostingMessage { thread_id } => {
                posting_message(client, thread_id, request).await?
            }
            SessionState::StartingRun { thread_id } => {
                starting_run(client, thread_id, assistant_id).await?
            }
            SessionState::Polling {
                thread_id,
                run_id,
                attempts,
            } => polling(client, thread_id, run_id, attempts, poll_interval).await?,
            SessionState::Retrieving { thread_id } => retrieving(client, thread_id).await?,
            SessionState::Done(content) => {
                return Ok(AssistantResponse {
                    assistant_response: content,
                })
            }
        };
    }
}

async fn creating_thread(client: &OpenAiClient) -> Result<SessionState> {
    let thread = client.create_thread().await?;
    Ok(SessionState::PostingMessage {
        thread_id: thread.id,
    })
}

/// Only the final turn of the inbound conversation is forwarded; the
/// assistant keeps its own history on the thread.
async fn posting_message(
    client: &OpenAiClient,
    thread_id: String,
    request: &ChatRequest,
) -> Result<SessionState> {
    // The handler rejects empty message lists before the session starts
    let content = request
        .last_message_content()
        .ok_or(ProxyError::EmptyMessages)?;

    client.add_thread_message(&thread_id, content).await?;
    Ok(SessionState::StartingRun { thread_id })
}

async fn starting_run(
    client: &OpenAiClient,
    thread_id: String,
    assistant_id: &str,
) -> Result<SessionState> {
    let run = client.start_run(&thread_id, assistant_id).await?;
    Ok(SessionState::Polling {
        thread_id,
        run_id: run.id,
        attempts: 0,
    })
}

/// One poll attempt per transition. `completed` advances to retrieval, a
/// terminal failure status aborts, anything else sleeps and polls again
/// until the attempt budget is exhausted.
async fn polling(
    client: &OpenAiClient,
    thread_id: String,
    run_id: String,
    attempts: u32,
    poll_interval: Duration,
) -> Result<SessionState> {
    if attempts >= POLL_MAX_ATTEMPTS {
        tracing::warn!(
            run_id = %run_id,
            attempts = attempts,
            "Assistant run did not complete within the poll budget"
        );
        return Err(ProxyError::RunTimeout);
    }

    let run = client.run_status(&thread_id, &run_id).await?;

    if run.status == COMPLETED_STATUS {
        tracing::debug!(run_id = %run_id, attempts = attempts + 1, "Run completed");
        return Ok(SessionState::Retrieving { thread_id });
    }

    if TERMINAL_FAILURE_STATUSES.contains(&run.status.as_str()) {
        tracing::warn!(run_id = %run_id, status = %run.status, "Run ended without completing");
        return Err(ProxyError::RunFailed { status: run.status });
    }

    tokio::time::sleep(poll_interval).await;
    Ok(SessionState::Polling {
        thread_id,
        run_id,
        attempts: attempts + 1,
    })
}

/// Select the first assistant-authored message on the thread (the upstream
/// listing is newest-first) and hand its raw content blocks to `Done`.
async fn retrieving(client: &OpenAiClient, thread_id: String) -> Result<SessionState> {
    let messages = client.list_thread_messages(&thread_id).await?;

    let assistant_message = messages
        .data
        .into_iter()
        .find(|m| m.role == "assistant")
        .ok_or(ProxyError::MissingAssistantResponse)?;

    Ok(SessionState::Done(assistant_message.content))
}
