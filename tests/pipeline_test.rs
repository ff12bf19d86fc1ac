//! End-to-end tests for the request pipeline.
//!
//! Covers the four reference scenarios and the cross-crate properties:
//! cache correctness, eviction bound, fallback guarantee, compression bound,
//! normalization idempotence and score consistency.

use std::sync::Arc;

use redacta_cache::{CacheKey, IntelligentCache, TierKind};
use redacta_context::ContextCompressor;
use redacta_core::{
    config::{AppConfig, CacheConfig, ContextConfig, TierConfig},
    mocks::{FailingLlm, MockLlm},
    tokens::estimate_tokens,
    CachePayload, CausalTechnique, ComparativeTechnique, ConversationContext, EvaluationRequest,
    OppositionalTechnique, SourceTag, TransformationConfig, TransformationRequest, Turn,
    WordDifficulty,
};
use redacta_orchestrator::Orchestrator;
use redacta_prompt::PromptBuilder;
use redacta_rules::normalize::normalize;

fn all_configs() -> Vec<TransformationConfig> {
    vec![
        TransformationConfig::FormalityRewrite { formality_level: 85 },
        TransformationConfig::ArgumentativeRestructure {
            argumentative_level: 90,
        },
        TransformationConfig::SynonymEnrichment {
            word_difficulty: WordDifficulty::Complex,
        },
        TransformationConfig::AntonymInversion {
            word_difficulty: WordDifficulty::Medium,
        },
        TransformationConfig::CausalStructure {
            technique: CausalTechnique::Explanation,
            intensity: 40,
        },
        TransformationConfig::ComparativeStructure {
            technique: ComparativeTechnique::Contrast,
            intensity: 60,
        },
        TransformationConfig::OppositionalStructure {
            technique: OppositionalTechnique::Refutation,
            intensity: 80,
        },
        TransformationConfig::Normalize,
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_local_synonym_substitution() {
    let orchestrator = Orchestrator::builder().build().unwrap();
    let request = TransformationRequest::new(
        "Isso é muito importante.",
        TransformationConfig::SynonymEnrichment {
            word_difficulty: WordDifficulty::Medium,
        },
    );

    let result = orchestrator.transform(&request, None).await.unwrap();

    assert_eq!(result.source, SourceTag::Local);
    assert!(result.content.contains("fundamental"));
    assert!(!result.content.contains("importante"));
}

#[tokio::test]
async fn test_scenario_whitespace_variants_hit_the_cache() {
    let config = TransformationConfig::SynonymEnrichment {
        word_difficulty: WordDifficulty::Medium,
    };
    assert_eq!(
        CacheKey::for_transformation("A  educação  é boa.", &config),
        CacheKey::for_transformation("A educação é boa.", &config)
    );

    let orchestrator = Orchestrator::builder().build().unwrap();
    let first = orchestrator
        .transform(&TransformationRequest::new("A  educação  é boa.", config.clone()), None)
        .await
        .unwrap();
    let second = orchestrator
        .transform(&TransformationRequest::new("A educação é boa.", config), None)
        .await
        .unwrap();

    assert_ne!(first.source, SourceTag::Cache);
    assert_eq!(second.source, SourceTag::Cache);
    assert_eq!(second.content, first.content);
}

#[tokio::test]
async fn test_scenario_reported_total_is_replaced_by_sum() {
    let llm = MockLlm::constant(
        r#"{"totalScore":850,"competencies":[{"score":200},{"score":150},{"score":160},{"score":160},{"score":160}]}"#,
    );
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(llm))
        .build()
        .unwrap();

    let result = orchestrator
        .evaluate(&EvaluationRequest::new("Redação de teste sobre educação."))
        .await
        .unwrap();

    assert_eq!(result.source, SourceTag::Llm);
    assert_eq!(result.evaluation.total_score, 830);
}

#[tokio::test]
async fn test_scenario_timeout_yields_fallback() {
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(FailingLlm::timeout()))
        .build()
        .unwrap();
    let request = TransformationRequest::new(
        "A tecnologia muda a escola.",
        TransformationConfig::FormalityRewrite { formality_level: 90 },
    );

    let result = orchestrator.transform(&request, None).await.unwrap();

    assert_eq!(result.source, SourceTag::Fallback);
    assert!(!result.content.trim().is_empty());
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_failing_client_never_surfaces_an_error() {
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(FailingLlm::new("boom")))
        .build()
        .unwrap();

    for config in all_configs() {
        let transformation = config.transformation_type();
        let request = TransformationRequest::new("o transporte público é ruim. mas melhora.", config);
        let result = orchestrator.transform(&request, None).await.unwrap();

        assert!(
            matches!(result.source, SourceTag::Fallback | SourceTag::Local),
            "{} served by {}",
            transformation,
            result.source
        );
        assert!(!result.content.trim().is_empty(), "{}", transformation);
    }

    let evaluation = orchestrator
        .evaluate(&EvaluationRequest::new("Texto.").with_theme("Transporte"))
        .await
        .unwrap();
    assert_eq!(evaluation.source, SourceTag::Fallback);
}

#[test]
fn test_eviction_keeps_at_most_four_fifths() {
    let cache = IntelligentCache::new(CacheConfig {
        global: TierConfig::new(Some(3600), 10),
        ..Default::default()
    });
    let config = TransformationConfig::Normalize;

    for i in 0..11 {
        let text = format!("texto número {}", i);
        cache.store(&text, &config, CachePayload::Text(text.clone()), None);
    }

    let stats = cache.stats();
    let global = stats
        .tiers
        .iter()
        .find(|t| t.tier == TierKind::Global)
        .unwrap();
    assert_eq!(global.entries, 8);
    assert_eq!(global.evictions, 3);
}

#[test]
fn test_ten_turn_history_fits_the_budget() {
    let compressor = ContextCompressor::new(ContextConfig::default());
    let sentence = "A mobilidade urbana exige investimento contínuo em transporte coletivo \
                    e planejamento integrado entre municípios vizinhos da região metropolitana.";

    let mut turns = Vec::new();
    for i in 0..10 {
        let content = format!("{} Mensagem {}: {} {}", sentence, i, sentence, sentence);
        turns.push(if i % 2 == 0 {
            Turn::user(content)
        } else {
            Turn::assistant(content)
        });
    }
    let last = turns[9].content.clone();
    let second_last = turns[8].content.clone();
    let mut context = ConversationContext::with_turns(turns);

    let compressed = compressor.compress_conversation(&mut context);

    assert!(estimate_tokens(&compressed) <= 400);
    assert!(compressed.ends_with(&format!("Assistente: {}", last)));
    assert!(compressed.contains(&format!("Aluno: {}", second_last)));
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "o aluno  escreveu ,sem revisar.ele tentou de novo !",
        "Primeiro parágrafo .\n\n\nsegundo parágrafo;sem espaço",
        "",
    ];
    for input in inputs {
        let (once, _) = normalize(input);
        let (twice, changes) = normalize(&once);
        assert_eq!(once, twice);
        assert_eq!(changes, 0);
    }
}

#[tokio::test]
async fn test_scores_are_consistent_on_every_path() {
    let llm = MockLlm::constant(
        r#"{"total": 990, "competencies": [{"id":1,"score":250},{"id":2,"score":180},{"id":3,"score":180},{"id":4,"score":180},{"id":5,"score":180}]}"#,
    );
    let with_llm = Orchestrator::builder()
        .with_llm(Arc::new(llm))
        .build()
        .unwrap();
    let without_llm = Orchestrator::builder().build().unwrap();

    let essay = "A educação transforma a sociedade. Portanto, é preciso investir.\n\n\
                 Além disso, o governo deve ampliar vagas por meio de parcerias.";
    let request = EvaluationRequest::new(essay).with_theme("Educação");

    for orchestrator in [&with_llm, &without_llm] {
        let evaluation = orchestrator.evaluate(&request).await.unwrap().evaluation;
        let sum: u32 = evaluation.competencies.iter().map(|c| c.score).sum();

        assert_eq!(evaluation.competencies.len(), 5);
        assert_eq!(evaluation.total_score, sum);
        assert!(evaluation.competencies.iter().all(|c| c.score <= c.max_score));
    }
}

#[test]
fn test_prompts_are_deterministic() {
    let builder = PromptBuilder::new().unwrap();
    for config in all_configs() {
        let a = builder.build("O tema é atual.", &config).unwrap();
        let b = builder.build("O tema é atual.", &config).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("O tema é atual."));
    }
}

#[test]
fn test_default_config_file_matches_builtin_defaults() {
    let loaded = AppConfig::load().unwrap();
    let builtin = AppConfig::default();

    assert_eq!(loaded.cache.session, builtin.cache.session);
    assert_eq!(loaded.cache.template, builtin.cache.template);
    assert_eq!(loaded.pipeline.llm_timeout_ms, builtin.pipeline.llm_timeout_ms);
    assert_eq!(
        loaded.context.conversation_token_budget,
        builtin.context.conversation_token_budget
    );
}
