//! HTTP request handlers and router assembly for the LLM proxy.
//!
//! The proxy serves exactly one POST route, derived from configuration at
//! startup: `/v1/chat/completions` in direct mode, or
//! `/v1/assistants/{id}/messages` in assistant mode. Which forwarding
//! strategy the handler invokes follows the same configuration-time decision
//! and is never re-evaluated per request.

use crate::api::assistant;
use crate::api::models::ChatRequest;
use crate::api::upstream::OpenAiClient;
use crate::core::logging::{generate_request_id, REQUEST_ID};
use crate::core::{ProxyConfig, ProxyError, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    pub client: OpenAiClient,
}

impl AppState {
    /// Build state from configuration and the process-wide HTTP client.
    pub fn new(config: ProxyConfig, http_client: reqwest::Client) -> Self {
        let client = OpenAiClient::new(
            http_client,
            config.api_base.clone(),
            config.openai_api_key.clone(),
        );
        Self { config, client }
    }
}

/// Build the application router.
///
/// All origins, methods and headers are allowed on every route.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(&state.config.forward_path(), post(chat_forward))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Handle an inbound chat request in whichever mode is configured.
///
/// A malformed body (missing `messages`) is rejected by the `Json` extractor
/// with 422 before this function runs; an empty `messages` list is the
/// domain-level error checked here.
#[tracing::instrument(
    skip(state, payload),
    fields(model = %payload.model, messages = payload.messages.len())
)]
pub async fn chat_forward(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response> {
    let request_id = generate_request_id();

    REQUEST_ID
        .scope(request_id.clone(), async move {
            if payload.messages.is_empty() {
                return Err(ProxyError::EmptyMessages);
            }

            match &state.config.assistant_id {
                Some(assistant_id) => {
                    tracing::debug!(
                        request_id = %request_id,
                        assistant_id = %assistant_id,
                        "Forwarding through assistant session"
                    );
                    let envelope = assistant::forward(
                        &state.client,
                        assistant_id,
                        &payload,
                        state.config.poll_interval,
                    )
                    .await?;
                    Ok(Json(envelope).into_response())
                }
                None => {
                    tracing::debug!(request_id = %request_id, "Forwarding as direct completion");
                    let body = state.client.chat_completions(&payload).await?;
                    // Relay the upstream bytes untouched
                    Ok((
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                        .into_response())
                }
            }
        })
        .await
}

/// Basic health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
