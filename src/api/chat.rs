//! `POST /api/chat`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::chat::ChatRequest;
use crate::reply::ReplyResult;

use super::error::ApiError;
use super::AppState;

/// Answer one chat turn.
///
/// Malformed bodies are 400. Provider failures are 500 (503 on timeout) and
/// never produce a fabricated reply.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    match state.chat.respond(&request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(err) => {
            if !err.is_client_error() {
                error!(error = %err, "chat turn failed");
            }
            Err(err.into())
        }
    }
}
