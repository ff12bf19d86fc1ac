//! Rolling conversation summary.

use redacta_core::{tokens::truncate_to_budget, KeywordExtractor, Turn, TurnRole};

/// Topic keywords kept in a summary.
pub const SUMMARY_TOPICS: usize = 5;

struct Bucket {
    label: &'static str,
    markers: &'static [&'static str],
}

const USER_INTENTS: &[Bucket] = &[
    Bucket {
        label: "modificação solicitada",
        markers: &[
            "mude", "altere", "modifique", "reescreva", "corrija", "melhore", "ajuste", "troque",
            "substitua",
        ],
    },
    Bucket {
        label: "geração solicitada",
        markers: &["crie", "gere", "escreva", "elabore", "produza", "redija"],
    },
    Bucket {
        label: "explicação solicitada",
        markers: &["explique", "por que", "o que é", "como funciona", "dúvida"],
    },
    Bucket {
        label: "avaliação solicitada",
        markers: &["avalie", "nota", "competência", "pontuação"],
    },
];

const ASSISTANT_DECISIONS: &[Bucket] = &[
    Bucket {
        label: "texto reescrito",
        markers: &["reescrev", "substituí", "alterei", "modifiquei", "ajustei", "troquei"],
    },
    Bucket {
        label: "conteúdo gerado",
        markers: &["criei", "gerei", "elaborei", "aqui está", "segue"],
    },
    Bucket {
        label: "explicação fornecida",
        markers: &["significa", "ou seja", "isso ocorre", "explica"],
    },
    Bucket {
        label: "avaliação fornecida",
        markers: &["nota", "pontos", "competência"],
    },
];

/// Buckets hit by `texts`, most frequent first.
fn classify<'a>(texts: impl Iterator<Item = &'a str>, buckets: &[Bucket]) -> Vec<&'static str> {
    let mut counts = vec![0usize; buckets.len()];
    for text in texts {
        let lower = text.to_lowercase();
        for (i, bucket) in buckets.iter().enumerate() {
            if bucket.markers.iter().any(|m| lower.contains(m)) {
                counts[i] += 1;
            }
        }
    }

    let mut hit: Vec<(usize, usize)> = counts
        .into_iter()
        .enumerate()
        .filter(|(_, n)| *n > 0)
        .collect();
    hit.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hit.into_iter().map(|(i, _)| buckets[i].label).collect()
}

/// One length-bounded sentence describing `turns`.
pub fn summarize(turns: &[Turn], extractor: &dyn KeywordExtractor, budget: usize) -> String {
    if turns.is_empty() {
        return String::new();
    }

    let all_text = turns
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let topics = extractor.keywords(&all_text, SUMMARY_TOPICS);

    let user = classify(
        turns
            .iter()
            .filter(|t| t.role == TurnRole::User)
            .map(|t| t.content.as_str()),
        USER_INTENTS,
    );
    let assistant = classify(
        turns
            .iter()
            .filter(|t| t.role == TurnRole::Assistant)
            .map(|t| t.content.as_str()),
        ASSISTANT_DECISIONS,
    );

    let mut parts = Vec::new();
    if !topics.is_empty() {
        parts.push(format!("Tópicos: {}.", topics.join(", ")));
    }
    if !user.is_empty() {
        parts.push(format!("Pedidos: {}.", user.join(", ")));
    }
    if !assistant.is_empty() {
        parts.push(format!("Decisões: {}.", assistant.join(", ")));
    }
    if parts.is_empty() {
        parts.push(format!("{} mensagens anteriores sem tópicos identificados.", turns.len()));
    }

    truncate_to_budget(&parts.join(" "), budget)
}
