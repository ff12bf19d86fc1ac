//! Connective sets for the structural rewrites, keyed by family and technique.

use crate::types::{StructureFamily, StructureSpec};

#[derive(Debug, Clone, Copy)]
pub struct ConnectiveSet {
    pub family: StructureFamily,
    pub technique: &'static str,
    /// Connectives the rewrite should use, most typical first.
    pub connectives: &'static [&'static str],
    /// Sentence opener used when a connective is spliced in without the LLM.
    pub lead_in: &'static str,
}

pub const CONNECTIVE_SETS: &[ConnectiveSet] = &[
    ConnectiveSet {
        family: StructureFamily::Causal,
        technique: "cause_effect",
        connectives: &["porque", "visto que", "uma vez que", "em virtude de"],
        lead_in: "Em virtude disso,",
    },
    ConnectiveSet {
        family: StructureFamily::Causal,
        technique: "consequence",
        connectives: &["consequentemente", "por conseguinte", "de modo que", "portanto"],
        lead_in: "Consequentemente,",
    },
    ConnectiveSet {
        family: StructureFamily::Causal,
        technique: "explanation",
        connectives: &["isto é", "ou seja", "haja vista que", "dado que"],
        lead_in: "Isto é,",
    },
    ConnectiveSet {
        family: StructureFamily::Comparative,
        technique: "similarity",
        connectives: &["assim como", "da mesma forma", "igualmente", "tal qual"],
        lead_in: "Da mesma forma,",
    },
    ConnectiveSet {
        family: StructureFamily::Comparative,
        technique: "contrast",
        connectives: &["ao passo que", "enquanto", "diferentemente de", "em contrapartida"],
        lead_in: "Em contrapartida,",
    },
    ConnectiveSet {
        family: StructureFamily::Comparative,
        technique: "analogy",
        connectives: &["analogamente", "à semelhança de", "tal como", "como se"],
        lead_in: "Analogamente,",
    },
    ConnectiveSet {
        family: StructureFamily::Oppositional,
        technique: "concession",
        connectives: &["embora", "ainda que", "mesmo que", "apesar de"],
        lead_in: "Apesar disso,",
    },
    ConnectiveSet {
        family: StructureFamily::Oppositional,
        technique: "adversative",
        connectives: &["entretanto", "contudo", "todavia", "no entanto"],
        lead_in: "Entretanto,",
    },
    ConnectiveSet {
        family: StructureFamily::Oppositional,
        technique: "refutation",
        connectives: &["pelo contrário", "não obstante", "ao contrário do que se pensa"],
        lead_in: "Pelo contrário,",
    },
];

pub fn connective_set(spec: &StructureSpec) -> Option<&'static ConnectiveSet> {
    CONNECTIVE_SETS
        .iter()
        .find(|set| set.family == spec.family && set.technique == spec.technique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OppositionalTechnique, TransformationConfig};

    #[test]
    fn test_every_structural_config_has_a_set() {
        let configs = [
            r#"{"type":"causal_structure","technique":"cause_effect","intensity":50}"#,
            r#"{"type":"causal_structure","technique":"consequence","intensity":50}"#,
            r#"{"type":"causal_structure","technique":"explanation","intensity":50}"#,
            r#"{"type":"comparative_structure","technique":"similarity","intensity":50}"#,
            r#"{"type":"comparative_structure","technique":"contrast","intensity":50}"#,
            r#"{"type":"comparative_structure","technique":"analogy","intensity":50}"#,
            r#"{"type":"oppositional_structure","technique":"concession","intensity":50}"#,
            r#"{"type":"oppositional_structure","technique":"adversative","intensity":50}"#,
            r#"{"type":"oppositional_structure","technique":"refutation","intensity":50}"#,
        ];
        for raw in configs {
            let config: TransformationConfig = serde_json::from_str(raw).unwrap();
            let spec = config.structure().unwrap();
            assert!(connective_set(&spec).is_some(), "missing set for {}", raw);
        }
    }

    #[test]
    fn test_lookup_by_technique() {
        let config = TransformationConfig::OppositionalStructure {
            technique: OppositionalTechnique::Adversative,
            intensity: 80,
        };
        let set = connective_set(&config.structure().unwrap()).unwrap();
        assert_eq!(set.connectives[0], "entretanto");
    }
}
