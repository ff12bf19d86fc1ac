//! Deterministic generator used when the LLM path fails.
//!
//! Unlike the local handlers it never declines: every non-blank input yields
//! non-blank output, even if that output is only the normalized text.

use redacta_core::{
    connectives::connective_set,
    text::split_sentences,
    EssayEvaluation, StructureSpec, TransformationConfig, WordDifficulty,
};

use crate::evaluation::heuristic_evaluation;
use crate::handlers::starts_with_connective;
use crate::normalize::normalize;
use crate::vocabulary::{antonyms, connective_upgrades, vocabulary};

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, text: &str, config: &TransformationConfig) -> String {
        let (normalized, _) = normalize(text);

        let content = match config {
            TransformationConfig::Normalize => normalized,
            TransformationConfig::SynonymEnrichment { word_difficulty } => {
                vocabulary(*word_difficulty).apply(&normalized).0
            }
            TransformationConfig::AntonymInversion { .. } => antonyms().apply(&normalized).0,
            TransformationConfig::FormalityRewrite { .. } => {
                let (enriched, _) = vocabulary(WordDifficulty::Medium).apply(&normalized);
                connective_upgrades().apply(&enriched).0
            }
            TransformationConfig::ArgumentativeRestructure { .. } => {
                let (upgraded, _) = connective_upgrades().apply(&normalized);
                with_conclusion(&upgraded)
            }
            TransformationConfig::CausalStructure { .. }
            | TransformationConfig::ComparativeStructure { .. }
            | TransformationConfig::OppositionalStructure { .. } => {
                let (upgraded, _) = connective_upgrades().apply(&normalized);
                match config.structure() {
                    Some(spec) => with_lead_in(&upgraded, &spec),
                    None => upgraded,
                }
            }
        };

        if content.trim().is_empty() {
            // Only reachable for blank input, which validation rejects.
            text.trim().to_string()
        } else {
            content
        }
    }

    pub fn evaluate(&self, essay: &str, theme: Option<&str>) -> EssayEvaluation {
        heuristic_evaluation(essay, theme)
    }
}

/// Open the last sentence with the technique's lead-in, or the whole text
/// when it is a single sentence.
fn with_lead_in(text: &str, spec: &StructureSpec) -> String {
    let Some(set) = connective_set(spec) else {
        return text.to_string();
    };
    prefix_last_sentence(text, set.lead_in)
}

/// Make sure a multi-sentence text ends in an explicit conclusion.
fn with_conclusion(text: &str) -> String {
    if split_sentences(text).len() < 2 {
        return text.to_string();
    }
    prefix_last_sentence(text, "Portanto,")
}

fn prefix_last_sentence(text: &str, opener: &str) -> String {
    let trimmed = text.trim_end();
    let Some(last) = split_sentences(trimmed).pop() else {
        return text.to_string();
    };
    if starts_with_connective(&last) {
        return trimmed.to_string();
    }

    // Splice in place so paragraph breaks before the last sentence survive.
    let start = trimmed.len() - last.len();
    format!("{}{} {}", &trimmed[..start], opener, lowercase_initial(&last))
}

fn lowercase_initial(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match (chars.next(), chars.clone().next()) {
        // Keep acronyms such as "ENEM" intact.
        (Some(first), Some(second)) if second.is_uppercase() => {
            let mut out = first.to_string();
            out.extend(chars);
            out
        }
        (Some(first), _) => first.to_lowercase().chain(chars).collect(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redacta_core::{
        CausalTechnique, ComparativeTechnique, OppositionalTechnique, TransformationType,
    };

    fn all_configs() -> Vec<TransformationConfig> {
        vec![
            TransformationConfig::FormalityRewrite { formality_level: 90 },
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
                technique: CausalTechnique::Consequence,
                intensity: 60,
            },
            TransformationConfig::ComparativeStructure {
                technique: ComparativeTechnique::Contrast,
                intensity: 60,
            },
            TransformationConfig::OppositionalStructure {
                technique: OppositionalTechnique::Adversative,
                intensity: 60,
            },
            TransformationConfig::Normalize,
        ]
    }

    #[test]
    fn test_every_type_yields_non_empty_output() {
        let generator = FallbackGenerator::new();
        for config in all_configs() {
            for text in ["ok", "xyz", "  a  educação é boa .  "] {
                let out = generator.transform(text, &config);
                assert!(!out.trim().is_empty(), "{:?} on {:?}", config, text);
            }
        }
    }

    #[test]
    fn test_antonym_inversion() {
        let out = FallbackGenerator::new().transform(
            "O resultado foi bom e o investimento foi grande.",
            &TransformationConfig::AntonymInversion {
                word_difficulty: WordDifficulty::Medium,
            },
        );
        assert_eq!(out, "O resultado foi ruim e o investimento foi pequeno.");
    }

    #[test]
    fn test_structural_lead_in() {
        let config = TransformationConfig::CausalStructure {
            technique: CausalTechnique::Consequence,
            intensity: 60,
        };
        assert_eq!(config.transformation_type(), TransformationType::CausalStructure);

        let out = FallbackGenerator::new()
            .transform("Faltam bibliotecas. Os alunos leem pouco.", &config);
        assert_eq!(out, "Faltam bibliotecas. Consequentemente, os alunos leem pouco.");

        let single = FallbackGenerator::new().transform("O ENEM exige repertório.", &config);
        assert_eq!(single, "Consequentemente, o ENEM exige repertório.");
    }

    #[test]
    fn test_complex_synonyms_use_erudite_tier() {
        let out = FallbackGenerator::new().transform(
            "É importante resolver o problema.",
            &TransformationConfig::SynonymEnrichment {
                word_difficulty: WordDifficulty::Complex,
            },
        );
        assert_eq!(out, "É primordial dirimir o entrave.");
    }
}
