use redacta_core::{text, CachePayload, QualityScorer};

const BASE_SCORE: f64 = 0.3;
const MIN_LEN: usize = 20;
const MAX_LEN: usize = 2500;

/// Shape-based quality heuristic.
///
/// Rewards payloads of reasonable length, with sophisticated connectives and
/// more than one sentence. Scores are in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicQualityScorer;

impl QualityScorer for HeuristicQualityScorer {
    fn score(&self, payload: &CachePayload) -> f64 {
        let body = payload.scored_text();
        let len = body.chars().count();

        let mut score = BASE_SCORE;
        if (MIN_LEN..=MAX_LEN).contains(&len) {
            score += 0.3;
        }
        if text::contains_sophisticated_connective(&body) {
            score += 0.2;
        }
        if text::sentence_count(&body) > 1 {
            score += 0.2;
        }
        score.min(1.0)
    }
}
