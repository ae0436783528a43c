use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use treasury_relay::app;
use treasury_relay::config::RelayConfig;
use treasury_relay::external::fiscal_data::FiscalDataProvider;
use treasury_relay::logging::{init_logging, LoggingConfig};
use treasury_relay::services::llm_service::LlmService;
use treasury_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = RelayConfig::from_env().map_err(anyhow::Error::msg)?;

    let llm_service = LlmService::from_config(config.gateway.clone())
        .context("Failed to create AI gateway client")?;
    let reference_data = FiscalDataProvider::new(&config.reference_data)
        .context("Failed to create fiscal data client")?;

    tracing::info!(
        "🤖 AI gateway: {} (model: {}, timeout: {:?})",
        config.gateway.url,
        config.gateway.model,
        config.gateway.timeout
    );

    let state = AppState {
        llm_service: Arc::new(llm_service),
        reference_data: Arc::new(reference_data),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Treasury relay running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
