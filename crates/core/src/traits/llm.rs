//! LLM client contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Text-generation backend the pipeline calls on the LLM path.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Model identifier, used for metrics labels and cost logs.
    fn model_id(&self) -> &str {
        "unknown"
    }
}

/// Response from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated content.
    pub content: String,
    /// Finish reason.
    pub finish_reason: String,
    /// Token usage.
    pub usage: LlmUsage,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>, usage: LlmUsage) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            usage,
        }
    }
}

/// Token usage from LLM call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Prompt tokens.
    pub prompt_tokens: u64,
    /// Completion tokens.
    pub completion_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
}

impl LlmUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
