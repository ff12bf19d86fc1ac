//! Mock implementations of core traits for testing.
//!
//! Shared by every crate's unit tests and the root integration tests, so the
//! scripted/failing/slow behaviours stay consistent across the workspace.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::{
    traits::{LlmClient, LlmResponse, LlmUsage},
    Error, Result,
};

// =============================================================================
// Mock LLM Client
// =============================================================================

/// Scripted mock LLM that cycles through predefined responses.
pub struct MockLlm {
    responses: Vec<String>,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Create a new mock LLM with a queue of responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let content = self
            .responses
            .get(n % self.responses.len().max(1))
            .cloned()
            .unwrap_or_default();

        Ok(LlmResponse::new(content, LlmUsage::new(10, 20)))
    }

    fn model_id(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Failing / Slow LLM Clients
// =============================================================================

/// LLM that fails every call with the given message.
pub struct FailingLlm {
    message: String,
    call_count: AtomicUsize,
}

impl FailingLlm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A client whose calls look like network timeouts.
    pub fn timeout() -> Self {
        Self::new("request timed out")
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::upstream_unavailable(self.message.clone()))
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

/// LLM that sleeps before answering, for timeout tests.
pub struct SlowLlm {
    delay: Duration,
    response: String,
}

impl SlowLlm {
    pub fn new(delay: Duration, response: impl Into<String>) -> Self {
        Self {
            delay,
            response: response.into(),
        }
    }
}

#[async_trait]
impl LlmClient for SlowLlm {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(LlmResponse::new(self.response.clone(), LlmUsage::new(10, 20)))
    }

    fn model_id(&self) -> &str {
        "slow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_llm_cycles_and_records() {
        let llm = MockLlm::new(vec!["a".into(), "b".into()]);

        assert_eq!(llm.generate("p1").await.unwrap().content, "a");
        assert_eq!(llm.generate("p2").await.unwrap().content, "b");
        assert_eq!(llm.generate("p3").await.unwrap().content, "a");
        assert_eq!(llm.call_count(), 3);
        assert_eq!(llm.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_failing_llm_is_upstream_unavailable() {
        let llm = FailingLlm::timeout();
        let err = llm.generate("x").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        assert_eq!(llm.call_count(), 1);
    }
}
