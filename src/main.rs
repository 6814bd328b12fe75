use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use gemini_relay::config::AppConfig;
use gemini_relay::services::http::ReqwestTransport;
use gemini_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    if config.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; /chat/ and /models/ will return 500");
    }
    tracing::info!(
        "relaying to {} (model: {}, timeout: {:?})",
        config.gemini_base_url,
        config.gemini_model,
        config.upstream_timeout
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        transport: Box::new(ReqwestTransport::new()),
    });

    let app = gemini_relay::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
