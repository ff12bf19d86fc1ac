//! Word-boundary substitution tables.

use redacta_core::text::capitalize_first;
use regex::{Captures, Regex};
use std::cmp::Reverse;
use std::collections::HashMap;

/// A case-insensitive, whole-word substitution table.
///
/// All sources are matched in one left-to-right pass, longest source first,
/// so a replacement is never re-scanned within the same call.
pub struct SubstitutionTable {
    pattern: Option<Regex>,
    replacements: HashMap<String, &'static str>,
}

impl SubstitutionTable {
    pub fn new(pairs: &[(&'static str, &'static str)]) -> Self {
        Self::from_layers(&[pairs])
    }

    /// Merge several pair lists. Later layers override earlier ones.
    pub fn from_layers(layers: &[&[(&'static str, &'static str)]]) -> Self {
        let mut replacements = HashMap::new();
        for layer in layers {
            for (source, target) in layer.iter() {
                replacements.insert(source.to_lowercase(), *target);
            }
        }
        Self::build(replacements)
    }

    /// Table that maps each side of every pair to the other.
    pub fn bidirectional(pairs: &[(&'static str, &'static str)]) -> Self {
        let mut replacements = HashMap::new();
        for (a, b) in pairs {
            replacements.insert(a.to_lowercase(), *b);
            replacements.insert(b.to_lowercase(), *a);
        }
        Self::build(replacements)
    }

    fn build(replacements: HashMap<String, &'static str>) -> Self {
        let mut sources: Vec<&String> = replacements.keys().collect();
        sources.sort_by_key(|s| (Reverse(s.chars().count()), s.to_string()));

        let pattern = if sources.is_empty() {
            None
        } else {
            let alternation = sources
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
                    .expect("escaped literals form a valid pattern"),
            )
        };

        Self {
            pattern,
            replacements,
        }
    }

    /// Apply every substitution. Returns the new text and the change count.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let Some(pattern) = &self.pattern else {
            return (text.to_string(), 0);
        };

        let mut changes = 0;
        let replaced = pattern.replace_all(text, |caps: &Captures| {
            let found = &caps[0];
            match self.replacements.get(&found.to_lowercase()) {
                Some(target) => {
                    changes += 1;
                    match_case(found, target)
                }
                None => found.to_string(),
            }
        });
        (replaced.into_owned(), changes)
    }

    /// Every `(source, target)` pair that would fire on `text`, in order of
    /// appearance. Sources are lowercased.
    pub fn find_all(&self, text: &str) -> Vec<(String, &'static str)> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .find_iter(text)
            .filter_map(|m| {
                let source = m.as_str().to_lowercase();
                self.replacements.get(&source).map(|t| (source, *t))
            })
            .collect()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.replacements.keys().map(String::as_str)
    }

    pub fn targets(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.replacements.values().copied()
    }
}

/// Carry the capitalization of `found` over to `replacement`.
fn match_case(found: &str, replacement: &str) -> String {
    let letters: Vec<char> = found.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        replacement.to_uppercase()
    } else if found.chars().next().is_some_and(char::is_uppercase) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}
