//! Local handlers.
//!
//! A handler serves exactly one transformation type and only under its own
//! eligibility condition. Handlers never return partial results: when nothing
//! could be substituted the engine reports the request as unhandled.

use redacta_core::{
    connectives::CONNECTIVE_SETS,
    text::{split_sentences, SOPHISTICATED_CONNECTIVES},
    TransformationConfig, TransformationType, WordDifficulty,
};

use crate::engine::UnhandledReason;
use crate::normalize::{normalize, PARAGRAPH_BREAK};
use crate::vocabulary::{connective_upgrades, vocabulary};

/// Highest formality level the connective table can honour on its own.
pub const MAX_LOCAL_FORMALITY: u8 = 60;
/// Highest argumentative level served by the paragraph restructurer.
pub const MAX_LOCAL_ARGUMENTATIVE: u8 = 50;
/// Below this many sentences restructuring is left to the LLM.
pub const MIN_RESTRUCTURE_SENTENCES: usize = 3;

/// Output of a handler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub changes: usize,
}

pub trait LocalHandler: Send + Sync {
    /// Handler name, reported in logs and results.
    fn name(&self) -> &'static str;

    /// The single transformation type this handler serves.
    fn serves(&self) -> TransformationType;

    /// Whether this handler may run for the given input and config.
    fn check(&self, text: &str, config: &TransformationConfig) -> Result<(), UnhandledReason>;

    fn apply(&self, text: &str, config: &TransformationConfig) -> Rewrite;

    /// Handlers that succeed even when they change nothing.
    fn always_succeeds(&self) -> bool {
        false
    }
}

// =============================================================================
// Vocabulary substitution
// =============================================================================

pub struct VocabularySubstitution;

impl LocalHandler for VocabularySubstitution {
    fn name(&self) -> &'static str {
        "vocabulary_substitution"
    }

    fn serves(&self) -> TransformationType {
        TransformationType::SynonymEnrichment
    }

    fn check(&self, _text: &str, config: &TransformationConfig) -> Result<(), UnhandledReason> {
        match config.word_difficulty() {
            Some(WordDifficulty::Simple | WordDifficulty::Medium) => Ok(()),
            _ => Err(UnhandledReason::ConditionNotMet(
                "complex vocabulary needs the LLM".into(),
            )),
        }
    }

    fn apply(&self, text: &str, config: &TransformationConfig) -> Rewrite {
        let difficulty = config.word_difficulty().unwrap_or_default();
        let (content, changes) = vocabulary(difficulty).apply(text);
        Rewrite { content, changes }
    }
}

// =============================================================================
// Connective upgrade
// =============================================================================

pub struct ConnectiveUpgrade;

impl LocalHandler for ConnectiveUpgrade {
    fn name(&self) -> &'static str {
        "connective_upgrade"
    }

    fn serves(&self) -> TransformationType {
        TransformationType::FormalityRewrite
    }

    fn check(&self, _text: &str, config: &TransformationConfig) -> Result<(), UnhandledReason> {
        match config {
            TransformationConfig::FormalityRewrite { formality_level }
                if *formality_level <= MAX_LOCAL_FORMALITY =>
            {
                Ok(())
            }
            _ => Err(UnhandledReason::ConditionNotMet(format!(
                "formality level above {}",
                MAX_LOCAL_FORMALITY
            ))),
        }
    }

    fn apply(&self, text: &str, _config: &TransformationConfig) -> Rewrite {
        let (content, changes) = connective_upgrades().apply(text);
        Rewrite { content, changes }
    }
}

// =============================================================================
// Normalization
// =============================================================================

pub struct Normalization;

impl LocalHandler for Normalization {
    fn name(&self) -> &'static str {
        "normalization"
    }

    fn serves(&self) -> TransformationType {
        TransformationType::Normalize
    }

    fn check(&self, _text: &str, _config: &TransformationConfig) -> Result<(), UnhandledReason> {
        Ok(())
    }

    fn apply(&self, text: &str, _config: &TransformationConfig) -> Rewrite {
        let (content, changes) = normalize(text);
        Rewrite { content, changes }
    }

    fn always_succeeds(&self) -> bool {
        true
    }
}

// =============================================================================
// Paragraph restructuring
// =============================================================================

/// Openers that already link a sentence to the previous one.
const LINKING_OPENERS: &[&str] = &[
    "além disso",
    "por isso",
    "assim",
    "logo",
    "mas",
    "então",
    "porém",
    "no entanto",
    "por fim",
    "em suma",
    "desse modo",
    "dessa maneira",
    "por outro lado",
    "nesse contexto",
    "em primeiro lugar",
    "igualmente",
    "ainda assim",
    "enfim",
];

/// Words that may be lowercased when a connective is placed in front of them.
const LOWERCASE_SAFE: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "isso", "isto", "esse", "essa", "este",
    "esta", "esses", "essas", "ele", "ela", "eles", "elas", "nós", "eu", "muitos", "muitas",
    "alguns", "algumas", "há", "é", "não", "se", "quando", "como", "por", "para", "com", "em",
    "no", "na", "nos", "nas", "do", "da", "cada", "todo", "toda", "todos", "todas", "tal",
];

/// Opens the second through last sentences of a paragraph with linking
/// connectives (development, addition, conclusion).
pub struct ParagraphRestructure;

impl ParagraphRestructure {
    fn restructure_paragraph(paragraph: &str, changes: &mut usize) -> String {
        let sentences = split_sentences(paragraph);
        if sentences.len() < MIN_RESTRUCTURE_SENTENCES {
            return paragraph.trim().to_string();
        }

        let last = sentences.len() - 1;
        let rewritten: Vec<String> = sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                if i == 0 || starts_with_connective(sentence) {
                    return sentence.clone();
                }
                let opener = if i == last {
                    "Portanto,"
                } else if i == 1 {
                    "Nesse sentido,"
                } else {
                    "Ademais,"
                };
                *changes += 1;
                format!("{} {}", opener, lowercase_first_word(sentence))
            })
            .collect();
        rewritten.join(" ")
    }
}

impl LocalHandler for ParagraphRestructure {
    fn name(&self) -> &'static str {
        "paragraph_restructure"
    }

    fn serves(&self) -> TransformationType {
        TransformationType::ArgumentativeRestructure
    }

    fn check(&self, text: &str, config: &TransformationConfig) -> Result<(), UnhandledReason> {
        match config {
            TransformationConfig::ArgumentativeRestructure {
                argumentative_level,
            } if *argumentative_level <= MAX_LOCAL_ARGUMENTATIVE => {}
            _ => {
                return Err(UnhandledReason::ConditionNotMet(format!(
                    "argumentative level above {}",
                    MAX_LOCAL_ARGUMENTATIVE
                )))
            }
        }

        let longest = PARAGRAPH_BREAK
            .split(text)
            .map(|p| split_sentences(p).len())
            .max()
            .unwrap_or(0);
        if longest < MIN_RESTRUCTURE_SENTENCES {
            return Err(UnhandledReason::ConditionNotMet(format!(
                "fewer than {} sentences",
                MIN_RESTRUCTURE_SENTENCES
            )));
        }
        Ok(())
    }

    fn apply(&self, text: &str, _config: &TransformationConfig) -> Rewrite {
        let mut changes = 0;
        let content = PARAGRAPH_BREAK
            .split(text)
            .filter(|p| !p.trim().is_empty())
            .map(|p| Self::restructure_paragraph(p, &mut changes))
            .collect::<Vec<_>>()
            .join("\n\n");
        Rewrite { content, changes }
    }
}

/// True when the sentence already opens with a known connective.
pub fn starts_with_connective(sentence: &str) -> bool {
    let lower = sentence.trim_start().to_lowercase();
    let set_connectives = CONNECTIVE_SETS
        .iter()
        .flat_map(|set| set.connectives.iter().chain(std::iter::once(&set.lead_in)));

    SOPHISTICATED_CONNECTIVES
        .iter()
        .chain(LINKING_OPENERS.iter())
        .chain(set_connectives)
        .map(|c| c.trim_end_matches(',').to_lowercase())
        .any(|c| {
            lower.starts_with(&c)
                && lower[c.len()..]
                    .chars()
                    .next()
                    .map_or(true, |next| !next.is_alphanumeric())
        })
}

fn lowercase_first_word(sentence: &str) -> String {
    let first = sentence.split_whitespace().next().unwrap_or("");
    let bare = first.trim_end_matches(|c: char| !c.is_alphanumeric());
    if !LOWERCASE_SAFE.contains(&bare.to_lowercase().as_str()) {
        return sentence.to_string();
    }

    let mut chars = sentence.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
