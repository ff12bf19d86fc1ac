//! Per-model pricing used for LLM cost logs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pricing information for a model (per 1K tokens).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Model identifier (e.g., "openai:gpt-4o-mini").
    pub model_id: String,
    /// Cost per 1K input tokens in USD.
    pub input_cost_per_1k: f64,
    /// Cost per 1K output tokens in USD.
    pub output_cost_per_1k: f64,
}

impl ModelPricing {
    pub fn new(model_id: impl Into<String>, input: f64, output: f64) -> Self {
        Self {
            model_id: model_id.into(),
            input_cost_per_1k: input,
            output_cost_per_1k: output,
        }
    }

    /// Estimate cost for a request.
    pub fn estimate_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let input_cost = (input_tokens as f64 / 1000.0) * self.input_cost_per_1k;
        let output_cost = (output_tokens as f64 / 1000.0) * self.output_cost_per_1k;
        input_cost + output_cost
    }
}

/// Registry of model pricing, keyed by `provider:model`.
pub struct PricingRegistry {
    models: HashMap<String, ModelPricing>,
}

impl PricingRegistry {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Registry preloaded with the models the pipeline is usually run with.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ModelPricing::new("openai:gpt-4o-mini", 0.00015, 0.0006));
        registry.register(ModelPricing::new("openai:gpt-4o", 0.0025, 0.01));
        registry.register(ModelPricing::new("openrouter:openai/gpt-4o-mini", 0.00015, 0.0006));
        registry.register(ModelPricing::new("ollama:llama3.1", 0.0, 0.0));

        registry
    }

    pub fn register(&mut self, pricing: ModelPricing) {
        self.models.insert(pricing.model_id.clone(), pricing);
    }

    pub fn get(&self, model_id: &str) -> Option<&ModelPricing> {
        self.models.get(model_id)
    }
}

impl Default for PricingRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_pricing() {
        let pricing = ModelPricing::new("test:model", 1.0, 2.0);

        // 1000 input + 500 output = $1 + $1 = $2
        let cost = pricing.estimate_cost(1000, 500);
        assert!((cost - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = PricingRegistry::with_defaults();
        assert!(registry.get("openai:gpt-4o-mini").is_some());
        assert!(registry.get("gpt-4o-mini").is_none());

        let local = registry.get("ollama:llama3.1").unwrap();
        assert_eq!(local.estimate_cost(10_000, 10_000), 0.0);
    }
}
