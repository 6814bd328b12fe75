use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::{ChatRequest, NormalizedResponse};
use crate::services::ai::GeminiClient;
use crate::services::chat;
use crate::state::AppState;

// POST /chat/
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<NormalizedResponse>, AppError> {
    // A missing key is reported ahead of any body problem.
    let client = GeminiClient::from_config(state.transport.as_ref(), &state.config).map_err(|e| {
        tracing::error!("chat request rejected: {e}");
        e
    })?;

    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = chat::relay(&client, &request).await.map_err(|e| {
        tracing::warn!(status = %e.status(), "chat relay failed: {e}");
        e
    })?;

    Ok(Json(reply))
}
