use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{single_turn_payload, GenerateContentResponse, ListModelsResponse, ModelInfo};
use crate::services::http::{HttpTransport, Method, UpstreamRequest, UpstreamResponse};

const GENERATE_CONTENT: &str = "generateContent";

/// Gemini REST client borrowing the shared transport and configuration.
pub struct GeminiClient<'a> {
    transport: &'a dyn HttpTransport,
    api_key: &'a str,
    model: &'a str,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> GeminiClient<'a> {
    pub fn new(
        transport: &'a dyn HttpTransport,
        api_key: &'a str,
        model: &'a str,
        base_url: &'a str,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            api_key,
            model: model.strip_prefix("models/").unwrap_or(model),
            base_url: base_url.trim_end_matches('/'),
            timeout,
        }
    }

    /// Fails with `AppError::Config` when no API key is configured.
    pub fn from_config(transport: &'a dyn HttpTransport, config: &'a AppConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY not set on server".to_string()))?;

        Ok(Self::new(
            transport,
            api_key,
            &config.gemini_model,
            &config.gemini_base_url,
            config.upstream_timeout,
        ))
    }

    pub fn model(&self) -> &str {
        self.model
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1/models/{}:{}?key={}",
            self.base_url, self.model, GENERATE_CONTENT, self.api_key
        )
    }

    fn list_models_url(&self) -> String {
        format!("{}/v1/models?key={}", self.base_url, self.api_key)
    }

    async fn call(&self, method: Method, url: String, body: Option<serde_json::Value>) -> Result<String, AppError> {
        let resp = self
            .transport
            .send(UpstreamRequest {
                method,
                url,
                body,
                timeout: self.timeout,
            })
            .await
            .map_err(|e| {
                tracing::error!("failed to reach Gemini: {e}");
                AppError::Transport(e)
            })?;

        if !resp.is_success() {
            let UpstreamResponse { status, body } = resp;
            tracing::warn!("Gemini API error (status {status}): {body}");
            return Err(AppError::UpstreamStatus { status, body });
        }

        Ok(resp.body)
    }

    /// Sends `prompt` as a single user turn and returns the first generated text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        let payload = single_turn_payload(prompt);

        tracing::debug!(model = self.model, "calling Gemini generateContent");
        let body = self
            .call(Method::Post, self.generate_content_url(), Some(payload))
            .await?;

        extract_text(&body)
    }

    /// Models that support `generateContent`.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, AppError> {
        let body = self.call(Method::Get, self.list_models_url(), None).await?;

        let data: ListModelsResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("failed to parse Gemini model list: {e}");
            AppError::InvalidResponse(e.to_string())
        })?;

        Ok(data
            .models
            .into_iter()
            .filter(|m| m.supports(GENERATE_CONTENT))
            .collect())
    }
}

fn extract_text(body: &str) -> Result<String, AppError> {
    let data: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("failed to parse Gemini response: {e}");
        AppError::InvalidResponse(e.to_string())
    })?;

    let candidate = data
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InvalidResponse("no candidates in response".to_string()))?;

    candidate
        .content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InvalidResponse("candidate has no parts".to_string()))?
        .text
        .ok_or_else(|| AppError::InvalidResponse("first part has no text".to_string()))
}
