use axum::{Json, extract::State};

use crate::{state::AppState, types::HealthResponse};

pub async fn keep_alive() -> &'static str {
    "I'm alive"
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        bindings: state.registry.len().await,
        started_at: state.started_at,
    })
}
