//! Cleanup of raw LLM transformation output.

use once_cell::sync::Lazy;
use regex::Regex;

use redacta_core::{text::collapse_whitespace, Error, Result};

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6}\s|\*\*[^*]+\*\*:?$)").expect("valid regex"));

/// Prompt fields the model sometimes echoes back. Always dropped.
static ECHOED_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(contexto|técnica)\s*:").expect("valid regex"));

/// Echoed instructions and lead-ins. The whole line is dropped unless an
/// answer follows a colon on the same line.
static ECHOED_INSTRUCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(reescreva|reorganize|troque|inverta|corrija|responda|avalie|aqui está|segue (o|a) )")
        .expect("valid regex")
});

/// Labels in front of the actual answer, e.g. `Texto reescrito:`.
static ANSWER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(texto( reescrito| corrigido| reorganizado)?|resposta|resultado)\s*:\s*")
        .expect("valid regex")
});

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('“', '”'), ('\'', '\''), ('«', '»')];

/// Strip echoed instructions, headings, code fences, placeholders and
/// wrapping quotes, then shape the text like `input`: one paragraph if the
/// input had one, blank-line separated paragraphs otherwise.
pub fn sanitize(raw: &str, input: &str) -> Result<String> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        if line.starts_with("```") || HEADING.is_match(line) || ECHOED_FIELD.is_match(line) {
            continue;
        }
        let line = if ECHOED_INSTRUCTION.is_match(line) {
            match line.split_once(':') {
                Some((_, answer)) if !answer.trim().is_empty() => answer.trim(),
                _ => continue,
            }
        } else {
            line
        };

        let line = ANSWER_LABEL.replace(line, "");
        let line = PLACEHOLDER.replace_all(&line, "");
        let line = collapse_whitespace(&line);
        if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    let paragraphs: Vec<String> = paragraphs
        .iter()
        .map(|p| unwrap_quotes(p).to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let single_paragraph = PARAGRAPH_BREAK.split(input.trim()).count() <= 1;
    let text = if single_paragraph {
        paragraphs.join(" ")
    } else {
        paragraphs.join("\n\n")
    };
    let text = unwrap_quotes(&text).to_string();

    if text.is_empty() {
        return Err(Error::malformed_response("empty output after sanitization"));
    }
    Ok(text)
}

fn unwrap_quotes(text: &str) -> &str {
    let mut text = text.trim();
    loop {
        let stripped = QUOTE_PAIRS.iter().find_map(|&(open, close)| {
            text.strip_prefix(open)
                .and_then(|t| t.strip_suffix(close))
                .map(str::trim)
        });
        match stripped {
            Some(inner) => text = inner,
            None => return text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fences_labels_and_quotes_are_removed() {
        let raw = "```\nTexto reescrito: \"A escola é fundamental.\"\n```";
        assert_eq!(sanitize(raw, "A escola é importante.").unwrap(), "A escola é fundamental.");
    }

    #[test]
    fn test_echoed_instructions_and_headings_are_dropped() {
        let raw = "## Resultado\nReescreva o texto com formalidade 80%.\n**Versão final**\nO tema é relevante.";
        assert_eq!(sanitize(raw, "tema").unwrap(), "O tema é relevante.");
    }

    #[test]
    fn test_one_line_lead_in_keeps_the_answer() {
        let raw = "Aqui está o texto reescrito: A escola é fundamental para a sociedade.";
        assert_eq!(
            sanitize(raw, "A escola é importante.").unwrap(),
            "A escola é fundamental para a sociedade."
        );

        let raw = "Segue o texto: \"O tema é atual.\"";
        assert_eq!(sanitize(raw, "tema").unwrap(), "O tema é atual.");
    }

    #[test]
    fn test_lead_in_without_answer_is_dropped() {
        let raw = "Aqui está o texto reescrito:\nO tema é relevante.";
        assert_eq!(sanitize(raw, "tema").unwrap(), "O tema é relevante.");

        let raw = "Contexto: Aluno: me ajude\nO tema é relevante.";
        assert_eq!(sanitize(raw, "tema").unwrap(), "O tema é relevante.");
    }

    #[test]
    fn test_placeholders_are_removed() {
        let raw = "A cidade [inserir nome] cresce  rapidamente.";
        assert_eq!(sanitize(raw, "x").unwrap(), "A cidade cresce rapidamente.");
    }

    #[test]
    fn test_single_paragraph_input_collapses_output() {
        let raw = "Primeira frase.\n\nSegunda frase.";
        assert_eq!(sanitize(raw, "Uma frase só.").unwrap(), "Primeira frase. Segunda frase.");
    }

    #[test]
    fn test_multi_paragraph_input_keeps_paragraphs() {
        let raw = "Primeiro parágrafo\ncontinua.\n\n\nSegundo parágrafo.";
        let input = "Um.\n\nDois.";
        assert_eq!(
            sanitize(raw, input).unwrap(),
            "Primeiro parágrafo continua.\n\nSegundo parágrafo."
        );
    }

    #[test]
    fn test_empty_output_is_malformed() {
        let err = sanitize("```\n```\n\"\"", "texto").unwrap_err();
        assert!(matches!(err, Error::MalformedUpstreamResponse(_)));
    }
}
