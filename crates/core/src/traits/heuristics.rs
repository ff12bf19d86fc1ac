//! Swappable text heuristics.

use crate::types::CachePayload;

/// Scores a cached payload in `[0, 1]`. Higher scores survive eviction.
pub trait QualityScorer: Send + Sync {
    fn score(&self, payload: &CachePayload) -> f64;
}

/// Extracts the most salient keywords of a text, most relevant first.
pub trait KeywordExtractor: Send + Sync {
    fn keywords(&self, text: &str, limit: usize) -> Vec<String>;
}
