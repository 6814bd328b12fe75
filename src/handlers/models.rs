use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::ModelInfo;
use crate::services::ai::GeminiClient;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

// GET /models/
pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelsResponse>, AppError> {
    let client = GeminiClient::from_config(state.transport.as_ref(), &state.config)?;
    let models = client.list_models().await?;

    tracing::info!(count = models.len(), "listed generateContent models");
    Ok(Json(ModelsResponse { models }))
}
