//! LLM Proxy - main entry point
//!
//! Creates and runs the HTTP server with the configured forwarding route.

use anyhow::{Context, Result};
use chrono::Local;
use llm_proxy::{build_router, AppState, ProxyConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Custom time formatter that uses local timezone (respects TZ environment variable)
struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    init_tracing();

    let config = ProxyConfig::from_env()?;

    if config.public_access_key.is_some() {
        tracing::warn!(
            "LLM_PROXY_PUBLIC_ACCESS_KEY is set but request authentication is not yet enforced"
        );
    }

    let http_client = create_http_client(&config);
    let forward_path = config.forward_path();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    let mode = if config.assistant_id.is_some() {
        "assistant"
    } else {
        "direct"
    };

    let state = Arc::new(AppState::new(config, http_client));
    let app = build_router(state);

    tracing::info!("Starting LLM Proxy on {}", addr);
    tracing::info!("Forwarding mode: {}", mode);
    tracing::info!("Forward route: POST {}", forward_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging with local timezone.
///
/// Noisy HTTP library targets are always suppressed, even when RUST_LOG is
/// set to a blanket level that would otherwise let their trace logs through.
fn init_tracing() {
    let base_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,llm_proxy=debug".to_string());
    let filter_str = format!("{},hyper=warn,h2=warn,reqwest=warn", base_filter);
    let filter = tracing_subscriber::EnvFilter::new(filter_str);

    let no_color = std::env::var("NO_COLOR").is_ok();

    if no_color {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_timer(LocalTime))
            .init();
    }
}

/// Create the process-wide HTTP client with connection pooling.
///
/// Every upstream call, including each step of one assistant session,
/// borrows from this pool instead of opening a fresh connection context.
fn create_http_client(config: &ProxyConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()
        .expect("Failed to build HTTP client")
}
