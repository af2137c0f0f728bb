use crate::config::ServerConfig;
use crate::cors::{apply_cors_headers, preflight};
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[cfg(feature = "chess-rules")]
use crate::move_request;
#[cfg(feature = "chess-rules")]
use axum::body::Bytes;
#[cfg(feature = "chess-rules")]
use move_selector::MoveSelector;
#[cfg(feature = "chess-rules")]
use std::sync::Arc;
#[cfg(feature = "chess-rules")]
use tracing::info;

/// Shared, read-only handler state
#[derive(Clone, Default)]
pub struct AppState {
    // None means random moves only
    #[cfg(feature = "chess-rules")]
    selector: Option<Arc<dyn MoveSelector>>,
}

impl AppState {
    #[cfg(feature = "chess-rules")]
    pub fn new(selector: Option<Arc<dyn MoveSelector>>) -> Self {
        Self { selector }
    }

    /// Build state at startup, degrading to random moves if the model fails to load
    #[cfg(feature = "chess-rules")]
    pub fn from_config(config: &ServerConfig) -> Self {
        match move_selector::load_selector(&config.weights, config.searches) {
            Ok(selector) => {
                info!(
                    "Model-backed selector loaded from {} ({} searches)",
                    config.weights.display(),
                    config.searches
                );
                let selector: Arc<dyn MoveSelector> = Arc::new(selector);
                Self::new(Some(selector))
            }
            Err(e) => {
                warn!("Falling back to random move selector: {}", e);
                Self::new(None)
            }
        }
    }

    #[cfg(not(feature = "chess-rules"))]
    pub fn from_config(_config: &ServerConfig) -> Self {
        warn!("Built without chess-rules, /api/move will answer 500");
        Self::default()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health).options(preflight))
        .route("/api/move", post(api_move).options(preflight))
        .layer(middleware::from_fn(apply_cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

#[cfg(feature = "chess-rules")]
async fn api_move(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<Json<move_request::MoveResponse>, ApiError> {
    let fen = move_request::fen_from_body(&body)?;
    info!("/api/move from {}", addr.ip());
    let response = move_request::respond(state.selector.clone(), &fen).await?;
    Ok(Json(response))
}

#[cfg(not(feature = "chess-rules"))]
async fn api_move(
    State(_state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> ApiError {
    warn!("/api/move from {} rejected: rules engine not built in", addr.ip());
    ApiError::DependencyUnavailable("shakmaty")
}
