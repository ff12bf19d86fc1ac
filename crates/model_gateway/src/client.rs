//! OpenAI-compatible chat-completions client.
//!
//! Works with OpenAI, OpenRouter, Ollama and any endpoint exposing
//! `POST {base_url}/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use redacta_core::{
    config::LlmConfig, tokens::estimate_tokens, Error, LlmClient, LlmResponse, LlmUsage, Result,
};

use crate::pricing::PricingRegistry;

/// Configuration for [`OpenAiCompatClient`].
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Provider label, used as the pricing-registry prefix.
    pub provider: String,
    /// Model name sent in the request body.
    pub model: String,
    /// Endpoint root, without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    /// Hard HTTP timeout. The orchestrator applies its own, shorter one.
    pub request_timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            temperature: 0.4,
            max_tokens: None,
            system_prompt: None,
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn from_llm_config(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            provider: config.provider.to_lowercase(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
            ..Self::new(&config.base_url, api_key)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Reqwest-backed [`LlmClient`].
pub struct OpenAiCompatClient {
    config: OpenAiCompatConfig,
    http: reqwest::Client,
    pricing: PricingRegistry,
}

impl OpenAiCompatClient {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::gateway(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            pricing: PricingRegistry::with_defaults(),
        })
    }

    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = self.config.system_prompt {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": prompt }));

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "stream": false,
        });
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    fn log_cost(&self, usage: &LlmUsage) {
        let key = format!("{}:{}", self.config.provider, self.config.model);
        if let Some(pricing) = self.pricing.get(&key) {
            tracing::debug!(
                model = %self.config.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                cost_usd = pricing.estimate_cost(usage.prompt_tokens, usage.completion_tokens),
                "LLM call cost"
            );
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_tokens = estimate_tokens(prompt),
            "Calling LLM"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("Network error: {}", e)))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(Error::upstream_unavailable("Rate limited by provider"));
        }
        if status == 401 || status == 403 {
            return Err(Error::upstream_unavailable(
                "Invalid API key or insufficient permissions",
            ));
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, body = %body, "Provider returned error");
            return Err(Error::upstream_unavailable(format!(
                "Provider returned status {}",
                status
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed_response(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed_response("No choices in response"))?;
        let content = choice.message.content.unwrap_or_default();

        let usage = match api_response.usage {
            Some(u) => LlmUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            },
            None => LlmUsage::new(estimate_tokens(prompt), estimate_tokens(&content)),
        };
        self.log_cost(&usage);

        Ok(LlmResponse {
            content,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}
