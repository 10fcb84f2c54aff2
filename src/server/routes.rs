//! Relay HTTP API.
//!
//! Mounted under `server.mount_path`:
//! - POST {mount}/openai
//! - POST {mount}/ollama
//!
//! At the root:
//! - GET /health
//! - GET /metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::RelayError;
use crate::metrics::{Backend, RelayMetrics};
use crate::relay::{self, azure, ollama, Relayed};

/// Application state shared across handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
    pub metrics: RelayMetrics,
    pub start_time: Instant,
}

impl AppState {
    /// Build state with an outbound client bounded by the configured timeouts.
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.server.connect_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            metrics: RelayMetrics::new()?,
            start_time: Instant::now(),
        })
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let relay_routes = Router::new()
        .route("/openai", post(relay_openai))
        .route("/ollama", post(relay_ollama));

    let mount = normalize_mount_path(&state.config.server.mount_path);
    let app = match mount {
        Some(prefix) => Router::new().nest(&prefix, relay_routes),
        None => relay_routes,
    };

    app.route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `None` means mount at the root.
fn normalize_mount_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

// ─── Response Types ────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub backends: BackendStatus,
}

#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub azure_configured: bool,
    pub ollama_base_url: String,
    pub ollama_model: String,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn relay_openai(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let result = match relay::parse_inbound(&body) {
        Ok(inbound) => azure::forward(&state.client, &state.config.azure, inbound).await,
        Err(e) => Err(e),
    };
    finish(&state, Backend::Azure, result)
}

async fn relay_ollama(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let result = match relay::parse_inbound(&body) {
        Ok(inbound) => ollama::forward(&state.client, &state.config.ollama, inbound).await,
        Err(e) => Err(e),
    };
    finish(&state, Backend::Ollama, result)
}

fn finish(
    state: &AppState,
    backend: Backend,
    result: Result<Relayed, RelayError>,
) -> Result<Relayed, RelayError> {
    let request_id = Uuid::new_v4().to_string();
    state.metrics.observe(backend, &result);

    match &result {
        Ok(relayed) => info!(
            request_id,
            backend = %backend,
            status = relayed.status.as_u16(),
            "Relayed upstream response"
        ),
        Err(e) => warn!(
            request_id,
            backend = %backend,
            status = e.status_code().as_u16(),
            error = %e,
            "Relay failed"
        ),
    }
    result
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        backends: BackendStatus {
            azure_configured: config.azure.is_configured(),
            ollama_base_url: config.ollama.base_url().to_string(),
            ollama_model: config.ollama.model().to_string(),
        },
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
