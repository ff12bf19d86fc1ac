//! Builder for Orchestrator.

use std::sync::Arc;

use redacta_cache::IntelligentCache;
use redacta_context::ContextCompressor;
use redacta_core::{
    config::{AppConfig, CacheConfig, ContextConfig, PipelineConfig},
    LlmClient, Result,
};
use redacta_prompt::PromptBuilder;
use redacta_rules::{FallbackGenerator, RuleEngine};

use crate::orchestrator::Orchestrator;

/// Builder for constructing an [`Orchestrator`].
pub struct OrchestratorBuilder {
    pipeline: PipelineConfig,
    cache: Option<Arc<IntelligentCache>>,
    rules: RuleEngine,
    compressor: Option<ContextCompressor>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl OrchestratorBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            cache: None,
            rules: RuleEngine::default(),
            compressor: None,
            llm: None,
        }
    }

    /// Take pipeline, cache and context settings from the app config.
    pub fn with_app_config(self, config: &AppConfig) -> Self {
        self.with_pipeline_config(config.pipeline.clone())
            .with_cache(Arc::new(IntelligentCache::new(config.cache.clone())))
            .with_compressor(ContextCompressor::new(config.context.clone()))
    }

    pub fn with_pipeline_config(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Share an existing cache instance.
    pub fn with_cache(mut self, cache: Arc<IntelligentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the local rule engine.
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_compressor(mut self, compressor: ContextCompressor) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Set the LLM client.
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set or clear the LLM client.
    pub fn with_optional_llm(mut self, llm: Option<Arc<dyn LlmClient>>) -> Self {
        self.llm = llm;
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator> {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(IntelligentCache::new(CacheConfig::default())));
        let compressor = self
            .compressor
            .unwrap_or_else(|| ContextCompressor::new(ContextConfig::default()));

        Ok(Orchestrator {
            pipeline: self.pipeline,
            cache,
            rules: self.rules,
            fallback: FallbackGenerator::new(),
            compressor,
            prompts: PromptBuilder::new()?,
            llm: self.llm,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
