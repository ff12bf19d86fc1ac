use redacta_core::{
    text::{is_stopword, words},
    KeywordExtractor,
};
use std::collections::HashMap;

/// Words shorter than this are never keywords.
const MIN_KEYWORD_CHARS: usize = 4;

/// Frequency-ranked, stopword-filtered keywords. Ties keep first-appearance order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyKeywordExtractor;

impl KeywordExtractor for FrequencyKeywordExtractor {
    fn keywords(&self, text: &str, limit: usize) -> Vec<String> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for (position, word) in words(text).into_iter().enumerate() {
            if word.chars().count() < MIN_KEYWORD_CHARS || is_stopword(&word) {
                continue;
            }
            if word.chars().all(|c| c.is_numeric()) {
                continue;
            }
            counts.entry(word).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked.into_iter().take(limit).map(|(word, _)| word).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_then_position() {
        let keywords = FrequencyKeywordExtractor.keywords(
            "A leitura amplia o repertório. Leitura diária melhora a escrita e o repertório.",
            3,
        );
        assert_eq!(keywords, vec!["leitura", "repertório", "amplia"]);
    }

    #[test]
    fn test_stopwords_and_short_words_are_ignored() {
        let keywords = FrequencyKeywordExtractor.keywords("isso é para você, de novo 2024", 5);
        assert_eq!(keywords, vec!["novo"]);
    }
}
