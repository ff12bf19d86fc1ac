//! Portuguese labels spliced into prompts.

use redacta_core::{StructureFamily, WordDifficulty};

pub fn difficulty_label(difficulty: WordDifficulty) -> &'static str {
    match difficulty {
        WordDifficulty::Simple => "simples",
        WordDifficulty::Medium => "intermediário",
        WordDifficulty::Complex => "avançado",
    }
}

pub fn family_label(family: StructureFamily) -> &'static str {
    match family {
        StructureFamily::Causal => "causal",
        StructureFamily::Comparative => "comparativa",
        StructureFamily::Oppositional => "de oposição",
    }
}

pub fn technique_label(technique: &str) -> &str {
    match technique {
        "cause_effect" => "causa e efeito",
        "consequence" => "consequência",
        "explanation" => "explicação",
        "similarity" => "semelhança",
        "contrast" => "contraste",
        "analogy" => "analogia",
        "concession" => "concessão",
        "adversative" => "adversativa",
        "refutation" => "refutação",
        other => other,
    }
}
