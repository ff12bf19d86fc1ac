use redacta_core::{
    connectives::connective_set, Error, Result, TransformationConfig, TransformationType,
};
use tera::{Context, Tera};

use crate::labels::{difficulty_label, family_label, technique_label};

const TEMPLATES: &[(&str, &str)] = &[
    (
        "formality_rewrite",
        "Reescreva o texto com formalidade {{ level }}%, mantendo o sentido.\n\
         Texto: {{ text }}\n\
         Responda só com o texto reescrito.",
    ),
    (
        "argumentative_restructure",
        "Reorganize o texto em tese, argumento e conclusão (nível argumentativo {{ level }}%).\n\
         Texto: {{ text }}\n\
         Responda só com o texto reorganizado.",
    ),
    (
        "synonym_enrichment",
        "Troque palavras comuns por sinônimos de nível {{ difficulty }}, sem mudar o sentido.\n\
         Texto: {{ text }}\n\
         Responda só com o texto reescrito.",
    ),
    (
        "antonym_inversion",
        "Inverta o sentido do texto usando antônimos de nível {{ difficulty }}.\n\
         Texto: {{ text }}\n\
         Responda só com o texto reescrito.",
    ),
    (
        "structural",
        "Reescreva o texto com estrutura {{ family }} usando: {{ connectives }}. \
         técnica: {{ technique }}, intensidade: {{ intensity }}%\n\
         Texto: {{ text }}\n\
         Responda só com o texto reescrito.",
    ),
    (
        "normalize",
        "Corrija espaços, pontuação e maiúsculas sem trocar palavras.\n\
         Texto: {{ text }}\n\
         Responda só com o texto corrigido.",
    ),
    (
        "essay_evaluation",
        "Avalie a redação ENEM{% if theme %} sobre \"{{ theme }}\"{% endif %} nas 5 competências (0 a 200 cada).\n\
         Redação: {{ essay }}\n\
         Responda só JSON: {\"totalScore\":0,\"competencies\":[{\"id\":1,\"score\":0,\"feedback\":\"\"}],\"generalFeedback\":\"\"}",
    ),
];

/// Renders compact, per-type prompts with Tera.
pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| Error::template(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Template used for a config. Structural types share one.
    pub fn template_name(config: &TransformationConfig) -> &'static str {
        let transformation = config.transformation_type();
        if transformation.is_structural() {
            "structural"
        } else {
            transformation.as_str()
        }
    }

    pub fn build(&self, text: &str, config: &TransformationConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("text", text.trim());

        match config {
            TransformationConfig::FormalityRewrite { formality_level } => {
                context.insert("level", formality_level);
            }
            TransformationConfig::ArgumentativeRestructure {
                argumentative_level,
            } => {
                context.insert("level", argumentative_level);
            }
            TransformationConfig::SynonymEnrichment { word_difficulty }
            | TransformationConfig::AntonymInversion { word_difficulty } => {
                context.insert("difficulty", difficulty_label(*word_difficulty));
            }
            TransformationConfig::Normalize => {}
            TransformationConfig::CausalStructure { .. }
            | TransformationConfig::ComparativeStructure { .. }
            | TransformationConfig::OppositionalStructure { .. } => {
                let spec = config
                    .structure()
                    .ok_or_else(|| Error::template("structural config without structure"))?;
                let set = connective_set(&spec).ok_or_else(|| {
                    Error::template(format!("no connective set for {}", spec.technique))
                })?;
                context.insert("family", family_label(spec.family));
                context.insert("connectives", &set.connectives.join(", "));
                context.insert("technique", technique_label(spec.technique));
                context.insert("intensity", &spec.intensity);
            }
        }

        self.render(Self::template_name(config), &context)
    }

    /// Same as [`build`](Self::build), with a compressed-context line first.
    pub fn build_with_context(
        &self,
        text: &str,
        config: &TransformationConfig,
        context: Option<&str>,
    ) -> Result<String> {
        let prompt = self.build(text, config)?;
        match context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => Ok(format!("Contexto: {}\n{}", context, prompt)),
            None => Ok(prompt),
        }
    }

    /// Prompt asking for a strict JSON five-competency score.
    pub fn build_evaluation(&self, essay: &str, theme: Option<&str>) -> Result<String> {
        let mut context = Context::new();
        context.insert("essay", essay.trim());
        if let Some(theme) = theme.map(str::trim).filter(|t| !t.is_empty()) {
            context.insert("theme", theme);
        }
        self.render(TransformationType::EssayEvaluation.as_str(), &context)
    }

    fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::template(format!("{}: {}", name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redacta_core::{tokens::estimate_tokens, CausalTechnique, WordDifficulty};

    #[test]
    fn test_build_is_deterministic_and_literal() {
        let builder = PromptBuilder::new().unwrap();
        let config = TransformationConfig::SynonymEnrichment {
            word_difficulty: WordDifficulty::Complex,
        };
        let a = builder.build("  A escola é importante.  ", &config).unwrap();
        let b = builder.build("A escola é importante.", &config).unwrap();

        assert_eq!(a, b);
        assert!(a.contains("Texto: A escola é importante."));
        assert!(a.contains("nível avançado"));
    }

    #[test]
    fn test_structural_fragment() {
        let builder = PromptBuilder::new().unwrap();
        let config = TransformationConfig::CausalStructure {
            technique: CausalTechnique::Consequence,
            intensity: 70,
        };
        let prompt = builder.build("As cidades crescem.", &config).unwrap();

        assert!(prompt.contains("técnica: consequência, intensidade: 70%"));
        assert!(prompt.contains("consequentemente, por conseguinte"));
        assert!(estimate_tokens(&prompt) < 60);
    }

    #[test]
    fn test_text_is_not_escaped() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .build("Ele disse \"sim\" & <saiu>.", &TransformationConfig::Normalize)
            .unwrap();
        assert!(prompt.contains("Ele disse \"sim\" & <saiu>."));
    }

    #[test]
    fn test_context_line_is_prepended() {
        let builder = PromptBuilder::new().unwrap();
        let config = TransformationConfig::FormalityRewrite { formality_level: 80 };

        let with = builder
            .build_with_context("texto", &config, Some("Resumo: tópicos: escola."))
            .unwrap();
        assert!(with.starts_with("Contexto: Resumo: tópicos: escola.\n"));

        let without = builder.build_with_context("texto", &config, Some("  ")).unwrap();
        assert_eq!(without, builder.build("texto", &config).unwrap());
    }

    #[test]
    fn test_evaluation_prompt() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .build_evaluation("Minha redação.", Some("Mobilidade urbana"))
            .unwrap();
        assert!(prompt.contains("sobre \"Mobilidade urbana\""));
        assert!(prompt.contains("\"competencies\""));

        let untitled = builder.build_evaluation("Minha redação.", None).unwrap();
        assert!(!untitled.contains("sobre"));
    }
}
