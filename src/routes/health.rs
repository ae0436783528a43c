use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub gateway_configured: bool,
}

/// Liveness plus whether analysis calls can reach the gateway at all
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    info!("GET /health - Health check");
    Json(HealthStatus {
        status: "OK",
        gateway_configured: state.llm_service.is_enabled(),
    })
}
