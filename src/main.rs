#![deny(unused)]
//! Redacta - writing-assistant request pipeline.
//!
//! Serves text transformations and ENEM essay evaluations over HTTP, with a
//! multi-tier cache, local rules and a fallback chain in front of the LLM.

use std::sync::Arc;

use redacta_core::config::AppConfig;
use redacta_gateway::{GatewayConfig, GatewayServer};
use redacta_orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    redacta_governance::configure_tracing(&config.logging)?;

    tracing::info!("Starting Redacta v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // LLM client
    // =========================================================================
    let llm = redacta_model_gateway::create_client_from_config(&config.llm)?;
    if llm.is_none() {
        tracing::warn!("No LLM client; requests will be served by cache, local rules and fallbacks");
    }

    // =========================================================================
    // Pipeline
    // =========================================================================
    let orchestrator = Orchestrator::builder()
        .with_app_config(&config)
        .with_optional_llm(llm)
        .build()?;

    // =========================================================================
    // Gateway
    // =========================================================================
    let mut server = GatewayServer::new(GatewayConfig::from(&config.server), Arc::new(orchestrator));

    match redacta_governance::setup_metrics_recorder() {
        Ok(handle) => server = server.with_metrics(handle),
        Err(e) => tracing::warn!(error = %e, "Metrics disabled"),
    }

    server.run().await?;
    Ok(())
}
