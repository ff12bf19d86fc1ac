use redacta_core::WordDifficulty;

use crate::vocabulary::{connective_upgrades, vocabulary};

/// Vocabulary suggestions for `text`, formatted as `"palavra → sugestão"`,
/// in order of first appearance and without duplicates.
pub fn suggestions(text: &str, difficulty: WordDifficulty) -> Vec<String> {
    let mut found = vocabulary(difficulty).find_all(text);
    found.extend(connective_upgrades().find_all(text));

    let mut seen = std::collections::HashSet::new();
    found
        .into_iter()
        .filter(|(source, _)| seen.insert(source.clone()))
        .map(|(source, target)| format!("{} → {}", source, target))
        .collect()
}
