//! The request pipeline.
//!
//! Transformations run VALIDATE → CACHE_LOOKUP → LOCAL_ATTEMPT → LLM_PATH,
//! and evaluations skip the local stage. Any failure after validation
//! lands in FALLBACK, whose results are never cached.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use redacta_cache::{CacheKey, IntelligentCache};
use redacta_context::ContextCompressor;
use redacta_core::{
    config::PipelineConfig, tokens::estimate_tokens, CachePayload, ConversationContext,
    EssayEvaluation, EvaluationRequest, EvaluationResult, Error, LlmClient, LlmResponse,
    LlmUsage, Result, SourceTag, TransformationConfig, TransformationRequest,
    TransformationResult, WordDifficulty,
};
use redacta_governance::{track_request, track_tokens};
use redacta_prompt::PromptBuilder;
use redacta_rules::{suggestions, FallbackGenerator, LocalAttempt, RuleEngine};

use crate::builder::OrchestratorBuilder;
use crate::repair::{reconcile, repair_and_parse};
use crate::sanitize::sanitize;

/// Pipeline stage that served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CacheLookup,
    LocalAttempt,
    LlmPath,
    Fallback,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheLookup => "cache_lookup",
            Self::LocalAttempt => "local_attempt",
            Self::LlmPath => "llm_path",
            Self::Fallback => "fallback",
        }
    }
}

/// Vocabulary suggestions for one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<String>,
    pub cached: bool,
}

/// Drives requests through cache, local rules, LLM and fallback.
pub struct Orchestrator {
    pub(crate) pipeline: PipelineConfig,
    pub(crate) cache: Arc<IntelligentCache>,
    pub(crate) rules: RuleEngine,
    pub(crate) fallback: FallbackGenerator,
    pub(crate) compressor: ContextCompressor,
    pub(crate) prompts: PromptBuilder,
    pub(crate) llm: Option<Arc<dyn LlmClient>>,
}

impl Orchestrator {
    /// Create a new builder for Orchestrator.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// The cache, for stats and invalidation.
    pub fn cache(&self) -> &Arc<IntelligentCache> {
        &self.cache
    }

    pub fn compressor(&self) -> &ContextCompressor {
        &self.compressor
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    // =========================================================================
    // Transformation flow
    // =========================================================================

    /// Transform `request.text`. Only validation failures are returned as
    /// errors; everything after validation yields a result.
    pub async fn transform(
        &self,
        request: &TransformationRequest,
        context: Option<&mut ConversationContext>,
    ) -> Result<TransformationResult> {
        let started = Instant::now();
        self.validate_text(&request.text, self.pipeline.max_input_chars)?;
        request.config.validate()?;

        let (result, stage) = self.run_transform(request, context).await;

        let token_estimate = result
            .token_estimate
            .unwrap_or_else(|| estimate_tokens(&request.text));
        self.finish(
            "transform",
            request.transformation_type().as_str(),
            stage,
            result.source,
            token_estimate,
            started,
        );
        Ok(result)
    }

    async fn run_transform(
        &self,
        request: &TransformationRequest,
        context: Option<&mut ConversationContext>,
    ) -> (TransformationResult, Stage) {
        let text = request.text.as_str();
        let config = &request.config;
        let owner = request.owner_id.as_deref();

        if let Some(hit) = self.cache.lookup(text, config, owner) {
            if let Some(content) = hit.payload.as_text() {
                return (
                    TransformationResult::new(content, SourceTag::Cache),
                    Stage::CacheLookup,
                );
            }
        }

        match self.rules.attempt(text, config) {
            LocalAttempt::Handled(local) => {
                tracing::debug!(
                    handler = local.handler,
                    changes = local.changes,
                    "Served by local rules"
                );
                self.cache
                    .store(text, config, CachePayload::Text(local.content.clone()), owner);
                return (
                    TransformationResult::new(local.content, SourceTag::Local),
                    Stage::LocalAttempt,
                );
            }
            LocalAttempt::Unhandled(reason) => {
                tracing::debug!(reason = %reason, "Local rules declined");
            }
        }

        match self.llm_transform(text, config, context).await {
            Ok((content, usage)) => {
                self.cache
                    .store(text, config, CachePayload::Text(content.clone()), owner);
                (
                    TransformationResult::new(content, SourceTag::Llm)
                        .with_token_estimate(usage.total_tokens),
                    Stage::LlmPath,
                )
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    transformation = %config.transformation_type(),
                    "LLM path failed, using fallback"
                );
                let mut content = self.fallback.transform(text, config);
                if content.trim().is_empty() {
                    content = text.trim().to_string();
                }
                (
                    TransformationResult::new(content, SourceTag::Fallback),
                    Stage::Fallback,
                )
            }
        }
    }

    async fn llm_transform(
        &self,
        text: &str,
        config: &TransformationConfig,
        context: Option<&mut ConversationContext>,
    ) -> Result<(String, LlmUsage)> {
        let llm = self.client()?;

        let compressed = context
            .map(|ctx| self.compressor.compress_conversation(ctx))
            .filter(|c| !c.is_empty());
        let prompt = match compressed {
            Some(ctx) => self.prompts.build_with_context(text, config, Some(&ctx))?,
            None => self.memoized_prompt(text, config)?,
        };

        let response = self.generate(llm, &prompt).await?;
        let content = sanitize(&response.content, text)?;
        Ok((content, response.usage))
    }

    /// Context-free prompts are kept in the template tier, so a retry after
    /// a fallback skips rendering.
    fn memoized_prompt(&self, text: &str, config: &TransformationConfig) -> Result<String> {
        let name = format!("prompt:{}", CacheKey::for_prompt(text, config));
        if let Some(prompt) = self.cache.lookup_template(&name) {
            return Ok(prompt);
        }
        let prompt = self.prompts.build(text, config)?;
        self.cache.store_template(&name, prompt.clone());
        Ok(prompt)
    }

    // =========================================================================
    // Evaluation flow
    // =========================================================================

    /// Score an essay on the five ENEM competencies.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        let started = Instant::now();
        self.validate_text(&request.essay, self.pipeline.max_essay_chars)?;

        let essay = request.essay.as_str();
        let theme = request
            .theme
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let owner = request.owner_id.as_deref();

        let (result, stage) = match self.cache.lookup_evaluation(essay, theme, owner) {
            Some((evaluation, _)) => (
                EvaluationResult {
                    evaluation,
                    source: SourceTag::Cache,
                    token_estimate: None,
                },
                Stage::CacheLookup,
            ),
            None => match self.llm_evaluate(essay, theme).await {
                Ok((evaluation, usage)) => {
                    self.cache
                        .store_evaluation(essay, theme, evaluation.clone(), owner);
                    (
                        EvaluationResult {
                            evaluation,
                            source: SourceTag::Llm,
                            token_estimate: Some(usage.total_tokens),
                        },
                        Stage::LlmPath,
                    )
                }
                Err(e) => {
                    tracing::warn!(error = %e, "LLM evaluation failed, using heuristic score");
                    (
                        EvaluationResult {
                            evaluation: self.fallback.evaluate(essay, theme),
                            source: SourceTag::Fallback,
                            token_estimate: None,
                        },
                        Stage::Fallback,
                    )
                }
            },
        };

        let token_estimate = result
            .token_estimate
            .unwrap_or_else(|| estimate_tokens(essay));
        self.finish(
            "evaluate",
            "essay_evaluation",
            stage,
            result.source,
            token_estimate,
            started,
        );
        Ok(result)
    }

    async fn llm_evaluate(
        &self,
        essay: &str,
        theme: Option<&str>,
    ) -> Result<(EssayEvaluation, LlmUsage)> {
        let llm = self.client()?;
        let prompt = self.prompts.build_evaluation(essay, theme)?;
        let response = self.generate(llm, &prompt).await?;

        let raw = repair_and_parse(&response.content)
            .map_err(|e| Error::malformed_response(e.to_string()))?;
        Ok((reconcile(raw), response.usage))
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Vocabulary suggestions, served from the result-set tier when possible.
    pub fn suggest(
        &self,
        text: &str,
        difficulty: WordDifficulty,
        owner_id: Option<&str>,
    ) -> Result<SuggestionResult> {
        let started = Instant::now();
        self.validate_text(text, self.pipeline.max_input_chars)?;

        let kind = format!("suggestions:{}", difficulty.as_str());
        let (items, source, stage) = match self.cache.lookup_list(text, &kind) {
            Some(items) => (items, SourceTag::Cache, Stage::CacheLookup),
            None => {
                let items = suggestions(text, difficulty);
                self.cache.store_list(text, &kind, items.clone());
                (items, SourceTag::Local, Stage::LocalAttempt)
            }
        };

        tracing::debug!(
            owner = owner_id.unwrap_or("-"),
            count = items.len(),
            "Suggestions computed"
        );
        self.finish("suggest", &kind, stage, source, 0, started);
        Ok(SuggestionResult {
            suggestions: items,
            cached: source == SourceTag::Cache,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn validate_text(&self, text: &str, max_chars: usize) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::validation("text must not be empty"));
        }
        let chars = text.chars().count();
        if chars > max_chars {
            return Err(Error::validation(format!(
                "text has {} characters, limit is {}",
                chars, max_chars
            )));
        }
        Ok(())
    }

    fn client(&self) -> Result<&Arc<dyn LlmClient>> {
        self.llm
            .as_ref()
            .ok_or_else(|| Error::upstream_unavailable("no LLM client configured"))
    }

    async fn generate(&self, llm: &Arc<dyn LlmClient>, prompt: &str) -> Result<LlmResponse> {
        let timeout = self.pipeline.llm_timeout();
        let response = tokio::time::timeout(timeout, llm.generate(prompt))
            .await
            .map_err(|_| {
                Error::upstream_unavailable(format!(
                    "LLM call timed out after {} ms",
                    timeout.as_millis()
                ))
            })??;

        track_tokens(llm.model_id(), &response.usage);
        Ok(response)
    }

    fn finish(
        &self,
        flow: &str,
        operation: &str,
        stage: Stage,
        source: SourceTag,
        token_estimate: u64,
        started: Instant,
    ) {
        let elapsed = started.elapsed();
        tracing::info!(
            flow,
            transformation = operation,
            stage = stage.as_str(),
            source = source.as_str(),
            token_estimate,
            latency_ms = elapsed.as_millis() as u64,
            "Request served"
        );
        track_request(flow, source, elapsed.as_secs_f64());
    }
}
