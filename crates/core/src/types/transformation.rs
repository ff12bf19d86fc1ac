use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// Transformation Types
// =============================================================================

/// Closed set of operations the pipeline serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationType {
    FormalityRewrite,
    ArgumentativeRestructure,
    SynonymEnrichment,
    AntonymInversion,
    CausalStructure,
    ComparativeStructure,
    OppositionalStructure,
    /// Whitespace and capitalization cleanup.
    Normalize,
    EssayEvaluation,
}

impl TransformationType {
    /// Stable identifier used in cache keys, metrics labels and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormalityRewrite => "formality_rewrite",
            Self::ArgumentativeRestructure => "argumentative_restructure",
            Self::SynonymEnrichment => "synonym_enrichment",
            Self::AntonymInversion => "antonym_inversion",
            Self::CausalStructure => "causal_structure",
            Self::ComparativeStructure => "comparative_structure",
            Self::OppositionalStructure => "oppositional_structure",
            Self::Normalize => "normalize",
            Self::EssayEvaluation => "essay_evaluation",
        }
    }

    /// Structural rewrites share a connective-set prompt and fallback.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CausalStructure | Self::ComparativeStructure | Self::OppositionalStructure
        )
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vocabulary tier requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordDifficulty {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl WordDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CausalTechnique {
    CauseEffect,
    Consequence,
    Explanation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparativeTechnique {
    Similarity,
    Contrast,
    Analogy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OppositionalTechnique {
    Concession,
    Adversative,
    Refutation,
}

/// Family of structural rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFamily {
    Causal,
    Comparative,
    Oppositional,
}

/// Flattened view of a structural config, used by the prompt builder
/// and the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureSpec {
    pub family: StructureFamily,
    pub technique: &'static str,
    pub intensity: u8,
}

// =============================================================================
// Per-type Configuration
// =============================================================================

/// Per-type option record. The variant is the transformation type, so each
/// handler only sees the fields relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformationConfig {
    FormalityRewrite {
        formality_level: u8,
    },
    ArgumentativeRestructure {
        argumentative_level: u8,
    },
    SynonymEnrichment {
        #[serde(default)]
        word_difficulty: WordDifficulty,
    },
    AntonymInversion {
        #[serde(default)]
        word_difficulty: WordDifficulty,
    },
    CausalStructure {
        technique: CausalTechnique,
        intensity: u8,
    },
    ComparativeStructure {
        technique: ComparativeTechnique,
        intensity: u8,
    },
    OppositionalStructure {
        technique: OppositionalTechnique,
        intensity: u8,
    },
    Normalize,
}

impl TransformationConfig {
    pub fn transformation_type(&self) -> TransformationType {
        match self {
            Self::FormalityRewrite { .. } => TransformationType::FormalityRewrite,
            Self::ArgumentativeRestructure { .. } => TransformationType::ArgumentativeRestructure,
            Self::SynonymEnrichment { .. } => TransformationType::SynonymEnrichment,
            Self::AntonymInversion { .. } => TransformationType::AntonymInversion,
            Self::CausalStructure { .. } => TransformationType::CausalStructure,
            Self::ComparativeStructure { .. } => TransformationType::ComparativeStructure,
            Self::OppositionalStructure { .. } => TransformationType::OppositionalStructure,
            Self::Normalize => TransformationType::Normalize,
        }
    }

    /// Percent-valued options must stay within `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        let (field, value) = match self {
            Self::FormalityRewrite { formality_level } => ("formality_level", *formality_level),
            Self::ArgumentativeRestructure { argumentative_level } => {
                ("argumentative_level", *argumentative_level)
            }
            Self::CausalStructure { intensity, .. }
            | Self::ComparativeStructure { intensity, .. }
            | Self::OppositionalStructure { intensity, .. } => ("intensity", *intensity),
            _ => return Ok(()),
        };

        if value > 100 {
            return Err(Error::validation(format!(
                "{} must be between 0 and 100, got {}",
                field, value
            )));
        }
        Ok(())
    }

    pub fn word_difficulty(&self) -> Option<WordDifficulty> {
        match self {
            Self::SynonymEnrichment { word_difficulty }
            | Self::AntonymInversion { word_difficulty } => Some(*word_difficulty),
            _ => None,
        }
    }

    pub fn structure(&self) -> Option<StructureSpec> {
        let spec = match self {
            Self::CausalStructure { technique, intensity } => StructureSpec {
                family: StructureFamily::Causal,
                technique: match technique {
                    CausalTechnique::CauseEffect => "cause_effect",
                    CausalTechnique::Consequence => "consequence",
                    CausalTechnique::Explanation => "explanation",
                },
                intensity: *intensity,
            },
            Self::ComparativeStructure { technique, intensity } => StructureSpec {
                family: StructureFamily::Comparative,
                technique: match technique {
                    ComparativeTechnique::Similarity => "similarity",
                    ComparativeTechnique::Contrast => "contrast",
                    ComparativeTechnique::Analogy => "analogy",
                },
                intensity: *intensity,
            },
            Self::OppositionalStructure { technique, intensity } => StructureSpec {
                family: StructureFamily::Oppositional,
                technique: match technique {
                    OppositionalTechnique::Concession => "concession",
                    OppositionalTechnique::Adversative => "adversative",
                    OppositionalTechnique::Refutation => "refutation",
                },
                intensity: *intensity,
            },
            _ => return None,
        };
        Some(spec)
    }
}

// =============================================================================
// Request / Result
// =============================================================================

/// Which pipeline stage produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Cache,
    Local,
    Llm,
    Fallback,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Local => "local",
            Self::Llm => "llm",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationRequest {
    pub text: String,
    pub config: TransformationConfig,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl TransformationRequest {
    pub fn new(text: impl Into<String>, config: TransformationConfig) -> Self {
        Self {
            text: text.into(),
            config,
            owner_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn transformation_type(&self) -> TransformationType {
        self.config.transformation_type()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub content: String,
    pub source: SourceTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_estimate: Option<u64>,
}

impl TransformationResult {
    pub fn new(content: impl Into<String>, source: SourceTag) -> Self {
        Self {
            content: content.into(),
            source,
            token_estimate: None,
        }
    }

    pub fn with_token_estimate(mut self, tokens: u64) -> Self {
        self.token_estimate = Some(tokens);
        self
    }
}
