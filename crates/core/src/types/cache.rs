use serde::{Deserialize, Serialize};

use super::evaluation::EssayEvaluation;

/// What a cache entry holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CachePayload {
    Text(String),
    Evaluation(EssayEvaluation),
    List(Vec<String>),
}

impl CachePayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_evaluation(&self) -> Option<&EssayEvaluation> {
        match self {
            Self::Evaluation(evaluation) => Some(evaluation),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text the quality heuristic inspects.
    pub fn scored_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Evaluation(evaluation) => evaluation.general_feedback.clone(),
            Self::List(items) => items.join(". "),
        }
    }
}
