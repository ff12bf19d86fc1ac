use serde::{Deserialize, Serialize};

use super::transformation::SourceTag;

/// An ENEM essay is graded on exactly five competencies.
pub const COMPETENCY_COUNT: usize = 5;

/// Maximum score of a single competency.
pub const COMPETENCY_MAX_SCORE: u32 = 200;

/// Canonical competency names, indexed by `id - 1`.
pub const COMPETENCY_NAMES: [&str; COMPETENCY_COUNT] = [
    "Domínio da norma culta",
    "Compreensão da proposta",
    "Organização das informações",
    "Mecanismos de coesão",
    "Proposta de intervenção",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    /// 1-based competency number.
    pub id: u8,
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
}

impl CompetencyScore {
    /// Build a score for competency `id`, clamped to the competency maximum.
    pub fn new(id: u8, score: u32, feedback: impl Into<String>) -> Self {
        let name = COMPETENCY_NAMES
            .get(usize::from(id).saturating_sub(1))
            .copied()
            .unwrap_or("Competência");
        Self {
            id,
            name: name.to_string(),
            score: score.min(COMPETENCY_MAX_SCORE),
            max_score: COMPETENCY_MAX_SCORE,
            feedback: feedback.into(),
        }
    }
}

/// Structured score breakdown for one essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayEvaluation {
    pub total_score: u32,
    pub competencies: Vec<CompetencyScore>,
    pub general_feedback: String,
}

impl EssayEvaluation {
    /// The total is always the sum of the (already clamped) sub-scores.
    pub fn from_competencies(
        competencies: Vec<CompetencyScore>,
        general_feedback: impl Into<String>,
    ) -> Self {
        let total_score = competencies.iter().map(|c| c.score).sum();
        Self {
            total_score,
            competencies,
            general_feedback: general_feedback.into(),
        }
    }

    pub fn max_total() -> u32 {
        COMPETENCY_MAX_SCORE * COMPETENCY_COUNT as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub essay: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl EvaluationRequest {
    pub fn new(essay: impl Into<String>) -> Self {
        Self {
            essay: essay.into(),
            theme: None,
            owner_id: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub evaluation: EssayEvaluation,
    pub source: SourceTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_estimate: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competency_score_is_clamped() {
        let score = CompetencyScore::new(3, 260, "");
        assert_eq!(score.score, 200);
        assert_eq!(score.name, "Organização das informações");
    }

    #[test]
    fn test_total_is_sum_of_competencies() {
        let evaluation = EssayEvaluation::from_competencies(
            vec![
                CompetencyScore::new(1, 200, ""),
                CompetencyScore::new(2, 150, ""),
                CompetencyScore::new(3, 160, ""),
                CompetencyScore::new(4, 160, ""),
                CompetencyScore::new(5, 160, ""),
            ],
            "",
        );
        assert_eq!(evaluation.total_score, 830);
        assert_eq!(EssayEvaluation::max_total(), 1000);
    }
}
