//! Small text utilities shared by the rule engine, cache and compressor.

/// Connectives that mark elaborated, formal Portuguese prose.
pub const SOPHISTICATED_CONNECTIVES: &[&str] = &[
    "portanto",
    "entretanto",
    "contudo",
    "todavia",
    "ademais",
    "outrossim",
    "consequentemente",
    "por conseguinte",
    "não obstante",
    "nesse sentido",
    "dessa forma",
    "sobretudo",
    "haja vista",
];

/// Portuguese function words ignored by keyword heuristics.
pub const STOPWORDS: &[&str] = &[
    "a", "ao", "aos", "as", "à", "às", "até", "com", "como", "da", "das", "de", "dela", "dele",
    "do", "dos", "e", "é", "ela", "ele", "eles", "em", "entre", "era", "essa", "esse", "esta",
    "este", "eu", "foi", "há", "isso", "isto", "já", "lhe", "mais", "mas", "me", "mesmo",
    "muito", "na", "nas", "nem", "no", "nos", "não", "o", "os", "ou", "para", "pela", "pelo",
    "por", "pode", "qual", "que", "se", "sem", "ser", "seu", "sua", "são", "também", "tem",
    "um", "uma", "vai", "você", "quero", "favor", "agora", "sobre", "ainda", "então", "fazer",
    "faça", "texto", "bem", "seja", "está", "estão",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on sentence-final punctuation followed by whitespace.
/// Punctuation stays attached to its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

pub fn sentence_count(text: &str) -> usize {
    split_sentences(text).len()
}

/// Uppercase the first alphabetic character.
pub fn capitalize_first(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut done = false;
    for c in text.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowercased alphanumeric tokens.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

pub fn contains_sophisticated_connective(text: &str) -> bool {
    let lower = text.to_lowercase();
    SOPHISTICATED_CONNECTIVES.iter().any(|c| lower.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Primeiro ponto. Segundo? Terceiro 3.5 valor! resto");
        assert_eq!(
            sentences,
            vec!["Primeiro ponto.", "Segundo?", "Terceiro 3.5 valor!", "resto"]
        );
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("  é simples."), "  É simples.");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_words_are_lowercase() {
        assert_eq!(words("A Educação, hoje!"), vec!["a", "educação", "hoje"]);
    }

    #[test]
    fn test_connective_detection() {
        assert!(contains_sophisticated_connective("Portanto, é preciso agir."));
        assert!(!contains_sophisticated_connective("Então é preciso agir."));
    }
}
