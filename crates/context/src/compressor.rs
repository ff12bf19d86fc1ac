//! Conversation and structure compression.

use once_cell::sync::Lazy;
use redacta_core::{
    config::ContextConfig,
    text::{capitalize_first, collapse_whitespace, split_sentences},
    tokens::{estimate_tokens, truncate_to_budget},
    ArgumentStructure, CompressedStructure, ConversationContext, KeywordExtractor, Turn, TurnRole,
};
use regex::Regex;
use std::sync::Arc;

use crate::keywords::FrequencyKeywordExtractor;
use crate::summary::{summarize, SUMMARY_TOPICS};

/// Turns always replayed verbatim (after boilerplate stripping).
pub const RECENT_TURNS: usize = 2;
/// Points kept in a compressed structure.
pub const MAX_STRUCTURE_POINTS: usize = 4;
/// Keywords per compressed point.
const POINT_KEYWORDS: usize = 3;
/// Token budget of a condensed middle turn.
const CONDENSED_TURN_TOKENS: usize = 16;

/// Politeness and instruction-framing phrases that carry no content.
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:por favor|você (?:pode|poderia) (?:me ajudar a )?|(?:eu )?gostaria que você |(?:eu )?quero que você |pode me ajudar a |como (?:um )?assistente,? |aqui está:?|claro[!,.]|certamente[!,.]|segue abaixo:?|espero ter ajudado[.!]?|fico à disposição[.!]?)",
    )
    .expect("valid regex")
});

/// Compresses caller-owned conversation state and argument outlines.
///
/// The compressor itself is stateless; everything it remembers between calls
/// lives in the [`ConversationContext`] it is handed.
pub struct ContextCompressor {
    config: ContextConfig,
    extractor: Arc<dyn KeywordExtractor>,
}

impl ContextCompressor {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            extractor: Arc::new(FrequencyKeywordExtractor),
        }
    }

    /// Replace the keyword heuristic.
    pub fn with_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Append a turn, refreshing the rolling summary on threshold crossing.
    pub fn record_turn(&self, context: &mut ConversationContext, turn: Turn) {
        context.turns.push(turn);
        self.refresh_summary(context);
    }

    /// Regenerate the rolling summary once enough older turns accumulated.
    /// Returns whether it was regenerated.
    pub fn refresh_summary(&self, context: &mut ConversationContext) -> bool {
        let older = context.turns.len().saturating_sub(RECENT_TURNS);
        let pending = older.saturating_sub(context.last_compression_marker);
        if pending == 0 || pending < self.config.compression_threshold {
            return false;
        }

        let summary = self.generate_summary(&context.turns[..older]);
        context.key_points = self
            .extractor
            .keywords(&joined_content(&context.turns[..older]), SUMMARY_TOPICS);
        context.rolling_summary = Some(summary);
        context.last_compression_marker = older;

        tracing::debug!(
            summarized_turns = older,
            key_points = context.key_points.len(),
            "Rolling summary regenerated"
        );
        true
    }

    pub fn generate_summary(&self, turns: &[Turn]) -> String {
        summarize(turns, self.extractor.as_ref(), self.config.summary_token_budget)
    }

    /// Render the conversation for a prompt.
    ///
    /// Layout: rolling summary, then one condensed line per turn newer than
    /// the summary, then the last two turns verbatim. Under budget pressure
    /// condensed lines are dropped oldest first, then the summary is
    /// truncated. The last two turns are never cut.
    pub fn compress_conversation(&self, context: &mut ConversationContext) -> String {
        self.refresh_summary(context);

        let total = context.turns.len();
        let recent_start = total.saturating_sub(RECENT_TURNS);
        let marker = context.last_compression_marker.min(recent_start);
        let budget = self.config.conversation_token_budget;

        let recent: Vec<String> = context.turns[recent_start..]
            .iter()
            .map(|turn| format!("{} {}", role_label(turn.role), strip_boilerplate(&turn.content)))
            .collect();
        let mut used: usize = recent.iter().map(|l| estimate_tokens(l) as usize).sum();

        let summary = context.rolling_summary.as_deref().unwrap_or("");
        let summary_line = if summary.is_empty() || used >= budget {
            None
        } else {
            let line = truncate_to_budget(&format!("Resumo: {}", summary), budget - used);
            (!line.is_empty()).then_some(line)
        };
        if let Some(line) = &summary_line {
            used += estimate_tokens(line) as usize;
        }

        // Newest first, so the oldest condensed lines are the ones dropped.
        let mut middle: Vec<String> = Vec::new();
        for turn in context.turns[marker..recent_start].iter().rev() {
            let line = condense_turn(turn);
            let cost = estimate_tokens(&line) as usize;
            if used + cost > budget {
                break;
            }
            used += cost;
            middle.push(line);
        }
        middle.reverse();

        let mut lines = Vec::with_capacity(middle.len() + 3);
        lines.extend(summary_line);
        lines.extend(middle);
        lines.extend(recent);

        tracing::debug!(
            turns = total,
            summarized = marker,
            token_estimate = used,
            budget,
            "Conversation compressed"
        );
        lines.join("\n")
    }

    /// Keep title/type plus up to four keyword-summarized points.
    pub fn compress_structure(&self, structure: &ArgumentStructure) -> CompressedStructure {
        let sources: Vec<String> = if structure.main_points.is_empty() {
            split_sentences(&structure.body)
        } else {
            structure.main_points.clone()
        };

        let mut compressed = CompressedStructure {
            title: truncate_to_budget(&collapse_whitespace(&structure.title), 16),
            structure_type: collapse_whitespace(&structure.structure_type),
            points: sources
                .iter()
                .map(|p| self.extractor.keywords(p, POINT_KEYWORDS).join(" "))
                .filter(|p| !p.is_empty())
                .take(MAX_STRUCTURE_POINTS)
                .collect(),
        };

        while compressed.points.len() > 1
            && estimate_tokens(&compressed.render()) as usize > self.config.structure_token_budget
        {
            compressed.points.pop();
        }
        compressed
    }
}

impl Default for ContextCompressor {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

fn role_label(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "Aluno:",
        TurnRole::Assistant => "Assistente:",
    }
}

fn condense_turn(turn: &Turn) -> String {
    let cleaned = strip_boilerplate(&turn.content);
    let first = split_sentences(&cleaned).into_iter().next().unwrap_or_default();
    format!(
        "{} {}",
        role_label(turn.role),
        truncate_to_budget(&first, CONDENSED_TURN_TOKENS)
    )
}

fn joined_content(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove politeness/instruction framing and tidy what is left.
pub fn strip_boilerplate(text: &str) -> String {
    let stripped = BOILERPLATE.replace_all(text, " ");
    let collapsed = collapse_whitespace(&stripped);
    let tidy = collapsed.trim_start_matches(|c: char| matches!(c, ',' | ':' | ';' | ' '));
    capitalize_first(tidy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!(
                        "Por favor, reescreva o parágrafo {} sobre desigualdade educacional no país \
                         usando conectivos mais formais e argumentos consistentes.",
                        i
                    ))
                } else {
                    Turn::assistant(format!(
                        "Reescrevi o parágrafo {} com conectivos formais. Aqui está a versão \
                         revisada com argumentos sobre desigualdade e acesso à educação pública.",
                        i
                    ))
                }
            })
            .collect()
    }

    #[test]
    fn test_strip_boilerplate() {
        assert_eq!(
            strip_boilerplate("Por favor, você poderia melhorar este texto?"),
            "Melhorar este texto?"
        );
        assert_eq!(strip_boilerplate("Claro! Aqui está: o texto."), "O texto.");
        assert_eq!(strip_boilerplate("Texto sem rodeios."), "Texto sem rodeios.");
    }

    #[test]
    fn test_ten_turn_history_fits_budget_and_keeps_last_two() {
        let compressor = ContextCompressor::default();
        let mut context = ConversationContext::with_turns(history(10));

        let out = compressor.compress_conversation(&mut context);

        assert!(estimate_tokens(&out) as usize <= compressor.config().conversation_token_budget);
        for turn in &context.turns[8..] {
            assert!(out.contains(&strip_boilerplate(&turn.content)));
        }
        assert!(out.starts_with("Resumo: Tópicos:"));
    }

    #[test]
    fn test_tight_budget_still_keeps_last_two() {
        let config = ContextConfig {
            conversation_token_budget: 90,
            ..ContextConfig::default()
        };
        let compressor = ContextCompressor::new(config);
        let mut context = ConversationContext::with_turns(history(10));

        let out = compressor.compress_conversation(&mut context);
        assert!(estimate_tokens(&out) <= 90);
        assert!(out.contains(&strip_boilerplate(&context.turns[9].content)));
        assert!(out.contains(&strip_boilerplate(&context.turns[8].content)));
    }

    #[test]
    fn test_last_two_turns_win_over_the_budget() {
        let config = ContextConfig {
            conversation_token_budget: 20,
            ..ContextConfig::default()
        };
        let compressor = ContextCompressor::new(config);
        let long = "A mobilidade urbana exige investimento contínuo em transporte coletivo \
                    e planejamento integrado entre municípios vizinhos da região metropolitana.";
        let mut context = ConversationContext::with_turns(vec![
            Turn::user("Primeira pergunta curta."),
            Turn::assistant("Primeira resposta curta."),
            Turn::user(long),
            Turn::assistant(long),
        ]);

        let out = compressor.compress_conversation(&mut context);

        // Only the two verbatim turns survive, even though they alone exceed the budget.
        assert!(estimate_tokens(&out) > 20);
        assert_eq!(
            out,
            format!("Aluno: {}\nAssistente: {}", long, long)
        );
    }

    #[test]
    fn test_summary_regenerates_only_on_threshold() {
        let compressor = ContextCompressor::default();
        let mut context = ConversationContext::new();

        // Threshold 4 plus the two recent turns: the sixth turn triggers it.
        for turn in history(5) {
            compressor.record_turn(&mut context, turn);
        }
        assert!(context.rolling_summary.is_none());

        compressor.record_turn(&mut context, Turn::user("Mais um pedido."));
        assert!(context.rolling_summary.is_some());
        assert_eq!(context.last_compression_marker, 4);
        assert!(!context.key_points.is_empty());

        // Three more turns leave 3 unsummarized older turns: no regeneration.
        let before = context.rolling_summary.clone();
        for turn in history(3) {
            compressor.record_turn(&mut context, turn);
        }
        assert_eq!(context.last_compression_marker, 4);
        assert_eq!(context.rolling_summary, before);

        compressor.record_turn(&mut context, Turn::assistant("Feito."));
        assert_eq!(context.last_compression_marker, 8);
    }

    #[test]
    fn test_turns_below_threshold_are_condensed() {
        let compressor = ContextCompressor::default();
        let mut context = ConversationContext::with_turns(history(5));

        let out = compressor.compress_conversation(&mut context);
        let lines: Vec<&str> = out.lines().collect();

        assert!(context.rolling_summary.is_none());
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Aluno: Reescreva o parágrafo 0"));
        assert!(estimate_tokens(lines[1]) as usize <= CONDENSED_TURN_TOKENS + 2);
    }

    #[test]
    fn test_short_history_is_replayed() {
        let compressor = ContextCompressor::default();
        let mut context = ConversationContext::with_turns(vec![
            Turn::user("Melhore a conclusão."),
            Turn::assistant("Conclusão revisada."),
        ]);
        let out = compressor.compress_conversation(&mut context);
        assert_eq!(out, "Aluno: Melhore a conclusão.\nAssistente: Conclusão revisada.");
    }

    #[test]
    fn test_compress_structure() {
        let structure = ArgumentStructure {
            title: "Desafios da educação digital".into(),
            structure_type: "dissertativo-argumentativo".into(),
            main_points: vec![
                "A falta de internet nas escolas públicas limita o acesso à internet.".into(),
                "Professores precisam de formação continuada em tecnologia.".into(),
                "O governo deve ampliar investimentos.".into(),
                "Famílias de baixa renda não têm computadores.".into(),
                "Um quinto ponto que deve ser descartado.".into(),
            ],
            body: String::new(),
        };
        let compressed = ContextCompressor::default().compress_structure(&structure);

        assert_eq!(compressed.title, "Desafios da educação digital");
        assert_eq!(compressed.points.len(), MAX_STRUCTURE_POINTS);
        assert!(compressed.points[0].starts_with("internet"));
    }

    #[test]
    fn test_compress_structure_from_body() {
        let structure = ArgumentStructure {
            title: "Mobilidade".into(),
            structure_type: "dissertativo".into(),
            main_points: vec![],
            body: "O transporte público é caro. Ciclovias são escassas.".into(),
        };
        let compressed = ContextCompressor::default().compress_structure(&structure);
        assert_eq!(compressed.points.len(), 2);
    }
}
