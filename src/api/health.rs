//! `GET /api/health`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Configured completion model.
    pub model: String,
}

/// Report liveness and the configured model. Does not call the provider.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        model: state.model.clone(),
    })
}
