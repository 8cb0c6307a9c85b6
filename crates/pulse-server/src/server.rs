//! HTTP server implementation using axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use pulse_core::{SnapshotCounts, SnapshotStatus, TrackedCoin, UniverseSnapshot};
use pulse_universe::UniverseManager;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    manager: Arc<UniverseManager>,
}

impl AppState {
    pub fn new(manager: Arc<UniverseManager>) -> Self {
        Self { manager }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    chain_id: String,
    now: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugCandidatesResponse {
    status: SnapshotStatus,
    counts: SnapshotCounts,
    top_ten: Vec<TrackedCoin>,
}

/// Create the axum router.
///
/// CORS is wide open: the snapshot is public read-only data consumed by an
/// external dashboard.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(get_health))
        .route("/api/live-universe", get(get_live_universe))
        .route("/api/debug/candidates", get(get_debug_candidates))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe with the configured chain id.
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "pulse-live-universe",
        chain_id: state.manager.config().chain_id.clone(),
        now: Utc::now().to_rfc3339(),
    })
}

/// Current universe snapshot.
async fn get_live_universe(State(state): State<AppState>) -> Json<UniverseSnapshot> {
    Json((*state.manager.snapshot()).clone())
}

/// Condensed debug view: status, counts, top ten ranked items.
async fn get_debug_candidates(State(state): State<AppState>) -> Json<DebugCandidatesResponse> {
    let snapshot = state.manager.snapshot();
    Json(DebugCandidatesResponse {
        status: snapshot.status,
        counts: snapshot.counts,
        top_ten: snapshot.items.iter().take(10).cloned().collect(),
    })
}

/// Run the HTTP server until it fails or the process stops.
pub async fn run_server(manager: Arc<UniverseManager>, config: ServerConfig) -> ServerResult<()> {
    let app = create_router(AppState::new(manager));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(port = config.port, "Starting live-universe API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
