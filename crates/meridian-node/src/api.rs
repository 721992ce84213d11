//! HTTP API server for the Meridian node.
//!
//! Inbound work requests carry an action identifier plus the packet
//! fields; responses carry a status marker and a content payload.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use meridian_core::types::{Packet, Priority};
use meridian_routing::{Fingerprint, RoutingError};

use crate::state::NodeState;

// --- Wire types ---

#[derive(Deserialize)]
pub struct RouteTaskRequest {
    /// Action identifier; only "route_packet" is understood.
    pub action: String,
    /// Destination node.
    pub target: String,
    /// Originating node.
    pub source: String,
    /// Hex-encoded attestation proof.
    #[serde(default)]
    pub proof: String,
    /// Caller-supplied freshness token.
    #[serde(default)]
    pub nonce: String,
    /// Priority class; unknown values fall back to best-effort.
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Serialize)]
pub struct TaskResponse {
    /// "success" or "error".
    pub status: String,
    /// Route on success, message on error.
    pub content: serde_json::Value,
}

impl TaskResponse {
    fn success(content: serde_json::Value) -> Json<Self> {
        Json(Self {
            status: "success".into(),
            content,
        })
    }

    fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: "error".into(),
            content: serde_json::Value::String(message.into()),
        })
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub node_name: String,
    pub topology_nodes: usize,
    pub cached_routes: usize,
    pub current_sigma: f64,
    pub uptime_secs: u64,
}

#[derive(Deserialize)]
pub struct SigmaUpdateRequest {
    pub sigma: f64,
}

// --- Handlers ---

async fn handle_status(State(state): State<Arc<NodeState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        node_name: state.node_name.clone(),
        topology_nodes: state.engine.topology().node_count(),
        cached_routes: state.engine.table().len(),
        current_sigma: state.monitor.get(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_route_task(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<RouteTaskRequest>,
) -> Result<Json<TaskResponse>, (StatusCode, Json<TaskResponse>)> {
    let request_id = uuid::Uuid::now_v7();

    if req.action != "route_packet" {
        return Err((
            StatusCode::BAD_REQUEST,
            TaskResponse::error(format!("unknown action: {}", req.action)),
        ));
    }

    let proof = hex::decode(&req.proof).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            TaskResponse::error(format!("proof is not valid hex: {}", e)),
        )
    })?;

    let priority = req.priority.as_deref().map(Priority::parse).unwrap_or_default();
    let packet = Packet::new(req.source, req.target, proof, req.nonce, priority);

    tracing::debug!(
        %request_id,
        source = %packet.source,
        destination = %packet.destination,
        "routing task accepted"
    );

    match state.engine.route_packet(&packet).await {
        Ok(route) => {
            let content = serde_json::to_value(&route)
                .unwrap_or_else(|_| json!({ "fingerprint": route.fingerprint.to_hex() }));
            Ok(TaskResponse::success(content))
        }
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "routing task failed");
            Err((gate_status_code(&e), TaskResponse::error(e.to_string())))
        }
    }
}

async fn handle_route_lookup(
    State(state): State<Arc<NodeState>>,
    Path(fingerprint): Path<String>,
) -> Result<Json<TaskResponse>, (StatusCode, Json<TaskResponse>)> {
    let fingerprint = Fingerprint::from_hex(&fingerprint).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            TaskResponse::error("fingerprint must be 64 hex characters"),
        )
    })?;

    match state.engine.table().lookup(&fingerprint, chrono::Utc::now()) {
        Some(route) => {
            let content = serde_json::to_value(&route)
                .unwrap_or_else(|_| json!({ "fingerprint": route.fingerprint.to_hex() }));
            Ok(TaskResponse::success(content))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            TaskResponse::error("no live route for fingerprint"),
        )),
    }
}

async fn handle_sigma_update(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<SigmaUpdateRequest>,
) -> Json<TaskResponse> {
    state.monitor.set(req.sigma);
    tracing::info!(sigma = req.sigma, "stability feed updated");
    TaskResponse::success(json!({ "sigma": req.sigma }))
}

/// HTTP status for each routing gate failure.
fn gate_status_code(error: &RoutingError) -> StatusCode {
    match error {
        RoutingError::Attestation { .. } => StatusCode::UNAUTHORIZED,
        RoutingError::Instability { .. } => StatusCode::SERVICE_UNAVAILABLE,
        RoutingError::TopologyViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RoutingError::DependencyTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        RoutingError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
    }
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/routes", post(handle_route_task))
        .route("/api/v1/routes/{fingerprint}", get(handle_route_lookup))
        .route("/api/v1/sigma", put(handle_sigma_update))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
