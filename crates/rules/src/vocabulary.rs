//! Substitution data.
//!
//! Within one difficulty, no target is also a source. That keeps the local
//! handlers idempotent: a second pass finds nothing left to replace.

use once_cell::sync::Lazy;
use redacta_core::WordDifficulty;

use crate::table::SubstitutionTable;

/// Everyday words with a more precise equivalent.
pub const SIMPLE_VOCABULARY: &[(&str, &str)] = &[
    ("coisa", "aspecto"),
    ("coisas", "aspectos"),
    ("muito bom", "excelente"),
    ("muito boa", "excelente"),
    ("muito ruim", "péssimo"),
    ("falar", "afirmar"),
    ("acho", "considero"),
    ("achamos", "consideramos"),
    ("ajudar", "auxiliar"),
    ("mostrar", "demonstrar"),
    ("mostra", "demonstra"),
    ("usar", "utilizar"),
    ("usa", "utiliza"),
    ("começar", "iniciar"),
    ("começa", "inicia"),
    ("acabar", "encerrar"),
    ("pegar", "obter"),
    ("botar", "colocar"),
    ("hoje em dia", "atualmente"),
    ("vários", "diversos"),
    ("várias", "diversas"),
];

pub const MEDIUM_VOCABULARY: &[(&str, &str)] = &[
    ("importante", "fundamental"),
    ("importantes", "fundamentais"),
    ("problema", "impasse"),
    ("problemas", "impasses"),
    ("pessoas", "indivíduos"),
    ("difícil", "complexo"),
    ("difíceis", "complexos"),
    ("mudar", "transformar"),
    ("mudança", "transformação"),
    ("mudanças", "transformações"),
    ("resolver", "solucionar"),
    ("jeito", "maneira"),
    ("melhorar", "aprimorar"),
    ("aumentar", "ampliar"),
    ("diminuir", "reduzir"),
    ("causar", "ocasionar"),
    ("precisa", "necessita"),
    ("precisam", "necessitam"),
    ("ruim", "prejudicial"),
    ("bom", "benéfico"),
    ("boa", "benéfica"),
    ("ideia", "concepção"),
    ("fazer", "realizar"),
    ("faz", "realiza"),
    ("fazem", "realizam"),
    ("sempre", "constantemente"),
];

/// Erudite overrides. Layered over the simple tier, replacing the medium one.
pub const COMPLEX_VOCABULARY: &[(&str, &str)] = &[
    ("importante", "primordial"),
    ("importantes", "primordiais"),
    ("problema", "entrave"),
    ("problemas", "entraves"),
    ("pessoas", "cidadãos"),
    ("mudar", "modificar"),
    ("mudança", "reformulação"),
    ("mudanças", "reformulações"),
    ("resolver", "dirimir"),
    ("melhorar", "otimizar"),
    ("aumentar", "potencializar"),
    ("diminuir", "mitigar"),
    ("causar", "acarretar"),
    ("mostrar", "evidenciar"),
    ("mostra", "evidencia"),
    ("bom", "profícuo"),
    ("boa", "profícua"),
    ("ideia", "premissa"),
    ("jeito", "modo"),
    ("acho", "julgo"),
];

/// Colloquial connectives and their formal counterparts.
pub const CONNECTIVE_UPGRADES: &[(&str, &str)] = &[
    ("mas", "contudo"),
    ("só que", "todavia"),
    ("então", "portanto"),
    ("porque", "visto que"),
    ("por isso", "por conseguinte"),
    ("além disso", "ademais"),
    ("também", "igualmente"),
    ("e também", "bem como"),
    ("daí", "consequentemente"),
    ("mesmo assim", "ainda assim"),
    ("enfim", "em suma"),
    ("no fim", "por fim"),
    ("pra", "para"),
    ("pro", "para o"),
];

/// Antonym pairs. Applied in both directions.
pub const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("bom", "ruim"),
    ("boa", "má"),
    ("melhor", "pior"),
    ("fácil", "difícil"),
    ("sempre", "nunca"),
    ("possível", "impossível"),
    ("grande", "pequeno"),
    ("grandes", "pequenos"),
    ("maior", "menor"),
    ("mais", "menos"),
    ("rico", "pobre"),
    ("ricos", "pobres"),
    ("forte", "fraco"),
    ("certo", "errado"),
    ("sucesso", "fracasso"),
    ("vantagem", "desvantagem"),
    ("vantagens", "desvantagens"),
    ("benefício", "prejuízo"),
    ("benefícios", "prejuízos"),
    ("incluir", "excluir"),
    ("inclusão", "exclusão"),
    ("aumentar", "diminuir"),
    ("aumento", "redução"),
    ("positivo", "negativo"),
    ("positiva", "negativa"),
    ("importante", "irrelevante"),
    ("presença", "ausência"),
    ("aceitar", "rejeitar"),
    ("ganhar", "perder"),
    ("início", "fim"),
];

static SIMPLE: Lazy<SubstitutionTable> = Lazy::new(|| SubstitutionTable::new(SIMPLE_VOCABULARY));
static MEDIUM: Lazy<SubstitutionTable> =
    Lazy::new(|| SubstitutionTable::from_layers(&[SIMPLE_VOCABULARY, MEDIUM_VOCABULARY]));
static COMPLEX: Lazy<SubstitutionTable> =
    Lazy::new(|| SubstitutionTable::from_layers(&[SIMPLE_VOCABULARY, COMPLEX_VOCABULARY]));
static CONNECTIVES: Lazy<SubstitutionTable> =
    Lazy::new(|| SubstitutionTable::new(CONNECTIVE_UPGRADES));
static ANTONYMS: Lazy<SubstitutionTable> =
    Lazy::new(|| SubstitutionTable::bidirectional(ANTONYM_PAIRS));

pub fn vocabulary(difficulty: WordDifficulty) -> &'static SubstitutionTable {
    match difficulty {
        WordDifficulty::Simple => &SIMPLE,
        WordDifficulty::Medium => &MEDIUM,
        WordDifficulty::Complex => &COMPLEX,
    }
}

pub fn connective_upgrades() -> &'static SubstitutionTable {
    &CONNECTIVES
}

pub fn antonyms() -> &'static SubstitutionTable {
    &ANTONYMS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_closed(table: &SubstitutionTable, label: &str) {
        let sources: HashSet<&str> = table.sources().collect();
        for target in table.targets() {
            for word in target.split_whitespace() {
                assert!(
                    !sources.contains(word.to_lowercase().as_str()),
                    "{}: target word '{}' is also a source",
                    label,
                    word
                );
            }
            assert!(!sources.contains(target), "{}: '{}' is a source", label, target);
        }
    }

    #[test]
    fn test_no_target_is_a_source() {
        assert_closed(vocabulary(WordDifficulty::Simple), "simple");
        assert_closed(vocabulary(WordDifficulty::Medium), "medium");
        assert_closed(vocabulary(WordDifficulty::Complex), "complex");
        assert_closed(connective_upgrades(), "connectives");
    }

    #[test]
    fn test_medium_includes_simple_tier() {
        let (out, n) = vocabulary(WordDifficulty::Medium).apply("Acho isso importante.");
        assert_eq!(out, "Considero isso fundamental.");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_complex_overrides_medium_targets() {
        let (out, _) = vocabulary(WordDifficulty::Complex).apply("um problema importante");
        assert_eq!(out, "um entrave primordial");
    }
}
