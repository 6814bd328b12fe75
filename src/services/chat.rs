use crate::errors::AppError;
use crate::models::{ChatRequest, NormalizedResponse};
use crate::services::ai::GeminiClient;

/// Text of the last message. Earlier turns are never forwarded upstream.
pub fn extract_prompt(request: &ChatRequest) -> Result<&str, AppError> {
    let last = request
        .messages
        .as_deref()
        .and_then(|m| m.last())
        .ok_or_else(|| AppError::BadRequest("No messages provided".to_string()))?;

    last.content
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Last message has no content".to_string()))
}

pub async fn relay(client: &GeminiClient<'_>, request: &ChatRequest) -> Result<NormalizedResponse, AppError> {
    let prompt = extract_prompt(request)?;

    tracing::info!(model = client.model(), prompt_len = prompt.len(), "relaying chat message");
    let text = client.generate_content(prompt).await?;

    Ok(NormalizedResponse::from_text(text))
}
