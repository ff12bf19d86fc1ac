#![deny(unused)]
//! Model gateway for Redacta.
//!
//! This crate provides:
//! - An OpenAI-compatible chat-completions client
//! - Per-model pricing for cost logs
//! - Client construction from [`LlmConfig`]

pub mod client;
pub mod pricing;

pub use client::{OpenAiCompatClient, OpenAiCompatConfig};
pub use pricing::{ModelPricing, PricingRegistry};

use std::sync::Arc;

use redacta_core::{config::LlmConfig, Error, LlmClient, Result};

/// Providers that speak the OpenAI chat-completions protocol.
const COMPATIBLE_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "compatible"];

/// Create an LLM client from configuration.
///
/// Returns `Ok(None)` when the LLM path is disabled or the API key is not
/// set; the pipeline then runs on cache, local rules and fallbacks only.
pub fn create_client_from_config(config: &LlmConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    if !config.enabled {
        tracing::info!("LLM path disabled by configuration");
        return Ok(None);
    }

    let provider = config.provider.to_lowercase();
    if !COMPATIBLE_PROVIDERS.contains(&provider.as_str()) {
        return Err(Error::Config(format!(
            "Unsupported LLM provider: {}",
            config.provider
        )));
    }

    let api_key = match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => key,
        // Local Ollama servers accept any bearer token.
        _ if provider == "ollama" => "ollama".to_string(),
        _ => {
            tracing::warn!(
                env = %config.api_key_env,
                "API key not set, running without an LLM client"
            );
            return Ok(None);
        }
    };

    let client_config = OpenAiCompatConfig::from_llm_config(config, api_key);
    let client = OpenAiCompatClient::new(client_config)?;
    tracing::info!(provider = %provider, model = %config.model, "LLM client ready");
    Ok(Some(Arc::new(client)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_yields_no_client() {
        let config = LlmConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(create_client_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_missing_key_yields_no_client() {
        let config = LlmConfig {
            api_key_env: "REDACTA_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        assert!(create_client_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = LlmConfig {
            provider: "carrier-pigeon".into(),
            ..Default::default()
        };
        assert!(matches!(
            create_client_from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "ollama".into(),
            base_url: "http://localhost:11434/v1".into(),
            api_key_env: "REDACTA_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        let client = create_client_from_config(&config).unwrap().unwrap();
        assert_eq!(client.model_id(), "gpt-4o-mini");
    }
}
