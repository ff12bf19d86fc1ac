//! Whitespace, punctuation spacing and capitalization cleanup.

use once_cell::sync::Lazy;
use redacta_core::text::{capitalize_first, collapse_whitespace};
use regex::{Captures, Regex};

pub(crate) static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\r?\n[ \t]*)+").expect("valid regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" +([,.;:!?])").expect("valid regex"));
static MISSING_SPACE_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([,;:!?])(\p{L})").expect("valid regex"));
static SENTENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?] )(\p{Ll})").expect("valid regex"));

/// Normalize `text`, keeping its paragraph breaks.
///
/// Returns the cleaned text and the number of fixes applied. Running it on
/// its own output always reports zero changes.
pub fn normalize(text: &str) -> (String, usize) {
    let mut changes = 0;

    let paragraphs: Vec<String> = PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let (paragraph, n) = normalize_paragraph(p);
            changes += n;
            paragraph
        })
        .collect();

    let joined = paragraphs.join("\n\n");
    if changes == 0 && joined != text {
        // Only outer whitespace or paragraph spacing differed.
        changes = 1;
    }
    (joined, changes)
}

fn normalize_paragraph(paragraph: &str) -> (String, usize) {
    let mut changes = 0;

    let mut out = collapse_whitespace(paragraph);
    if out != paragraph {
        changes += 1;
    }

    changes += SPACE_BEFORE_PUNCT.find_iter(&out).count();
    out = SPACE_BEFORE_PUNCT.replace_all(&out, "$1").into_owned();

    changes += MISSING_SPACE_AFTER.find_iter(&out).count();
    out = MISSING_SPACE_AFTER.replace_all(&out, "$1 $2").into_owned();

    changes += SENTENCE_START.find_iter(&out).count();
    out = SENTENCE_START
        .replace_all(&out, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned();

    let capitalized = capitalize_first(&out);
    if capitalized != out {
        changes += 1;
    }
    (capitalized, changes)
}
