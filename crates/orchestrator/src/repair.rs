//! Tolerant parsing of LLM essay scores.
//!
//! Models often wrap the score object in prose or code fences, or emit
//! near-JSON (trailing commas, bare keys, single quotes). `repair_and_parse`
//! accepts all of these and fails with a [`ParseError`] otherwise.

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

use redacta_core::{CompetencyScore, EssayEvaluation, COMPETENCY_COUNT, COMPETENCY_MAX_SCORE};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("invalid JSON after repair: {0}")]
    InvalidJson(String),

    #[error("expected {expected} competencies, found {found}")]
    MissingCompetencies { expected: usize, found: usize },
}

/// Score object as reported by the model, before clamping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEvaluation {
    #[serde(default, alias = "totalScore", alias = "total")]
    pub total_score: Option<f64>,
    pub competencies: Vec<RawCompetency>,
    #[serde(default, alias = "generalFeedback")]
    pub general_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCompetency {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u8>,
    #[serde(deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Accepts `160`, `160.0` and `"160"`.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("score out of range")),
        serde_json::Value::String(s) => s.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("invalid score: {}", other))),
    }
}

/// Accepts `1`, `"1"` and `"C1"`. Anything else becomes `None`, which
/// makes [`reconcile`] number competencies by position.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let id = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u8::try_from(v).ok()),
        serde_json::Value::String(s) => s
            .trim()
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .ok(),
        _ => None,
    };
    Ok(id)
}

/// Extract, repair and deserialize the score object in `raw`.
pub fn repair_and_parse(raw: &str) -> Result<RawEvaluation, ParseError> {
    let object = extract_object(raw).ok_or(ParseError::NoObject)?;

    let parsed = match serde_json::from_str::<RawEvaluation>(object) {
        Ok(parsed) => parsed,
        Err(_) => serde_json::from_str::<RawEvaluation>(&repair_json(object))
            .map_err(|e| ParseError::InvalidJson(e.to_string()))?,
    };

    if parsed.competencies.len() < COMPETENCY_COUNT {
        return Err(ParseError::MissingCompetencies {
            expected: COMPETENCY_COUNT,
            found: parsed.competencies.len(),
        });
    }
    Ok(parsed)
}

/// Clamp each sub-score and set the total to their sum.
///
/// Reported ids are honored when they are exactly `1..=5` without
/// repeats; otherwise competencies are numbered by position.
pub fn reconcile(raw: RawEvaluation) -> EssayEvaluation {
    let mut competencies: Vec<RawCompetency> =
        raw.competencies.into_iter().take(COMPETENCY_COUNT).collect();

    let mut seen = [false; COMPETENCY_COUNT];
    let ids_usable = competencies.iter().all(|c| match c.id {
        Some(id) if (1..=COMPETENCY_COUNT).contains(&usize::from(id)) => {
            !std::mem::replace(&mut seen[usize::from(id) - 1], true)
        }
        _ => false,
    });
    if ids_usable {
        competencies.sort_by_key(|c| c.id);
    }

    let scores = competencies
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let id = if ids_usable { c.id.unwrap_or(i as u8 + 1) } else { i as u8 + 1 };
            CompetencyScore::new(id, clamp_score(c.score), c.feedback.unwrap_or_default())
        })
        .collect();

    let evaluation =
        EssayEvaluation::from_competencies(scores, raw.general_feedback.unwrap_or_default());

    if let Some(reported) = raw.total_score {
        if reported.round() as i64 != i64::from(evaluation.total_score) {
            tracing::debug!(
                reported,
                reconciled = evaluation.total_score,
                "Reported total differs from sub-score sum"
            );
        }
    }
    evaluation
}

fn clamp_score(score: f64) -> u32 {
    if !score.is_finite() || score <= 0.0 {
        return 0;
    }
    (score.round() as u32).min(COMPETENCY_MAX_SCORE)
}

/// Slice from the first `{` to the last `}`. Skips fences and prose.
fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Rewrite near-JSON into JSON: quote bare keys, convert single-quoted
/// strings, drop trailing commas.
fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut containers: Vec<char> = Vec::new();
    let mut expect_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                i = read_string(&chars, i, &mut out);
                expect_key = false;
                continue;
            }
            '{' | '[' => {
                containers.push(c);
                expect_key = c == '{';
                out.push(c);
            }
            '}' | ']' => {
                containers.pop();
                expect_key = false;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    i += 1;
                    continue;
                }
                expect_key = containers.last() == Some(&'{');
                out.push(c);
            }
            c if expect_key && (c.is_alphabetic() || c == '_') => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                out.push('"');
                out.extend(&chars[start..i]);
                out.push('"');
                expect_key = false;
                continue;
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                expect_key = false;
                out.push(c);
            }
        }
        i += 1;
    }
    out
}

/// Copy the string literal starting at `start` as a double-quoted JSON
/// string. Returns the index after the closing quote.
fn read_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    out.push('"');

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() => {
                let escaped = chars[i + 1];
                if escaped == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(escaped);
                }
                i += 2;
                continue;
            }
            c if c == quote => {
                i += 1;
                break;
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
        i += 1;
    }

    out.push('"');
    i
}
