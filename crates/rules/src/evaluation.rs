//! Heuristic five-competency essay scoring.
//!
//! Each competency is scored in 40-point steps between 40 and 200, from
//! surface features only. It exists so the evaluation flow can always answer.

use once_cell::sync::Lazy;
use redacta_core::{
    connectives::CONNECTIVE_SETS,
    text::{is_stopword, sentence_count, words, SOPHISTICATED_CONNECTIVES},
    CompetencyScore, EssayEvaluation, COMPETENCY_MAX_SCORE,
};
use regex::Regex;

use crate::normalize::PARAGRAPH_BREAK;

const STEP: u32 = 40;

static COLLOQUIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:pra|pro|né|tipo assim|a gente|vc|tá|tô|daí|aí)\b").expect("valid regex")
});
static SPACING_ISSUES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" [,.;:!?]|[,;:!?]\p{L}|  +").expect("valid regex"));
static LOWERCASE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[.!?] )\p{Ll}").expect("valid regex"));

/// The five elements of an ENEM intervention proposal, as marker phrases.
const PROPOSAL_ELEMENTS: [&[&str]; 5] = [
    // agent
    &[
        "governo", "estado", "ministério", "escola", "escolas", "família", "mídia", "sociedade",
        "ongs", "poder público",
    ],
    // action
    &["deve", "devem", "cabe", "é necessário", "é preciso", "é fundamental"],
    // means
    &["por meio de", "mediante", "através de", "por intermédio de"],
    // purpose
    &["a fim de", "para que", "com o intuito de", "com o objetivo de"],
    // detail
    &["ou seja", "isto é", "por exemplo", "como"],
];

fn step_score(steps: u32) -> u32 {
    (steps.clamp(1, 5) * STEP).min(COMPETENCY_MAX_SCORE)
}

fn contains_phrase(lower: &str, phrase: &str) -> bool {
    lower.match_indices(phrase).any(|(i, _)| {
        let before = lower[..i].chars().next_back();
        let after = lower[i + phrase.len()..].chars().next();
        before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
    })
}

fn mechanics(essay: &str) -> (u32, String) {
    let issues = COLLOQUIAL.find_iter(essay).count()
        + SPACING_ISSUES.find_iter(essay).count()
        + LOWERCASE_START.find_iter(essay.trim_start()).count();
    let score = step_score(5u32.saturating_sub(issues.min(4) as u32));
    let feedback = match issues {
        0 => "Não foram encontrados desvios de pontuação ou registro.".to_string(),
        n => format!("Foram encontrados {} desvios de registro, pontuação ou espaçamento.", n),
    };
    (score, feedback)
}

fn theme_adherence(essay: &str, theme: Option<&str>) -> (u32, String) {
    let essay_words = words(essay);
    match theme {
        Some(theme) => {
            let keywords: Vec<String> = words(theme)
                .into_iter()
                .filter(|w| w.chars().count() >= 4 && !is_stopword(w))
                .collect();
            if keywords.is_empty() {
                return (step_score(3), "Tema sem palavras-chave identificáveis.".into());
            }
            let covered = keywords.iter().filter(|k| essay_words.contains(k)).count();
            let steps = 1 + (covered * 4 / keywords.len()) as u32;
            (
                step_score(steps),
                format!(
                    "O texto retoma {} de {} palavras-chave do tema.",
                    covered,
                    keywords.len()
                ),
            )
        }
        None => {
            let steps = match essay_words.len() {
                n if n >= 250 => 4,
                n if n >= 150 => 3,
                n if n >= 80 => 2,
                _ => 1,
            };
            (
                step_score(steps),
                "Sem tema informado; avaliado pela extensão do desenvolvimento.".into(),
            )
        }
    }
}

fn organization(essay: &str) -> (u32, String) {
    let paragraphs = PARAGRAPH_BREAK
        .split(essay)
        .filter(|p| !p.trim().is_empty())
        .count();
    let steps = match paragraphs {
        n if n >= 4 => 5,
        3 => 4,
        2 => 3,
        _ if sentence_count(essay) >= 5 => 2,
        _ => 1,
    };
    (
        step_score(steps),
        format!("Texto organizado em {} parágrafo(s).", paragraphs),
    )
}

fn cohesion(essay: &str) -> (u32, String) {
    let lower = essay.to_lowercase();
    let mut found: Vec<&str> = SOPHISTICATED_CONNECTIVES
        .iter()
        .chain(CONNECTIVE_SETS.iter().flat_map(|set| set.connectives.iter()))
        .copied()
        .filter(|c| contains_phrase(&lower, c))
        .collect();
    found.sort_unstable();
    found.dedup();

    let steps = 1 + found.len().min(4) as u32;
    (
        step_score(steps),
        format!("{} conectivo(s) distintos identificados.", found.len()),
    )
}

fn intervention(essay: &str) -> (u32, String) {
    let lower = essay.to_lowercase();
    let elements = PROPOSAL_ELEMENTS
        .iter()
        .filter(|markers| markers.iter().any(|m| contains_phrase(&lower, m)))
        .count();
    (
        step_score(elements as u32),
        format!("{} de 5 elementos da proposta de intervenção presentes.", elements),
    )
}

/// Score an essay without the LLM. The total is the sum of the sub-scores.
pub fn heuristic_evaluation(essay: &str, theme: Option<&str>) -> EssayEvaluation {
    let scores = [
        mechanics(essay),
        theme_adherence(essay, theme),
        organization(essay),
        cohesion(essay),
        intervention(essay),
    ];

    let competencies: Vec<CompetencyScore> = scores
        .into_iter()
        .zip(1u8..)
        .map(|((score, feedback), id)| CompetencyScore::new(id, score, feedback))
        .collect();

    let total: u32 = competencies.iter().map(|c| c.score).sum();
    let general = format!(
        "Avaliação automática simplificada ({} pontos). Revise os critérios com menor nota.",
        total
    );
    EssayEvaluation::from_competencies(competencies, general)
}
