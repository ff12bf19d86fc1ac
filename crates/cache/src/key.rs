//! Semantic hashing.

use redacta_core::{TransformationConfig, TransformationType};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-addressed cache key: SHA-256 hex digest of normalized content,
/// operation id and canonical (key-sorted) config JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash already-separated parts. Prefer the typed constructors.
    pub fn from_parts(content: &str, operation: &str, config: &Value) -> Self {
        let material = format!(
            "{}|{}|{}",
            normalize_content(content),
            operation,
            canonical_json(config)
        );
        let mut hasher = Sha256::new();
        hasher.update(material.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn for_transformation(content: &str, config: &TransformationConfig) -> Self {
        // A closed enum of plain fields cannot fail to serialize.
        let value = serde_json::to_value(config).unwrap_or(Value::Null);
        Self::from_parts(content, config.transformation_type().as_str(), &value)
    }

    pub fn for_evaluation(essay: &str, theme: Option<&str>) -> Self {
        let config = match theme {
            Some(theme) => serde_json::json!({ "theme": normalize_content(theme) }),
            None => Value::Null,
        };
        Self::from_parts(essay, TransformationType::EssayEvaluation.as_str(), &config)
    }

    /// Key of a result-set entry, e.g. `kind = "suggestions:medium"`.
    pub fn for_list(content: &str, kind: &str) -> Self {
        Self::from_parts(content, &format!("list:{}", kind), &Value::Null)
    }

    /// Key of a rendered prompt. The prompt embeds the text verbatim, so the
    /// literal (trimmed) text is hashed rather than its normalized form.
    pub fn for_prompt(text: &str, config: &TransformationConfig) -> Self {
        let value = serde_json::to_value(config).unwrap_or(Value::Null);
        let material = format!("prompt|{}|{}", text.trim(), canonical_json(&value));
        Self(format!("{:x}", Sha256::digest(material.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the same entry in an owner's session tier.
    pub(crate) fn scoped(&self, owner_id: &str) -> String {
        format!("{}{}", owner_prefix(owner_id), self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-width owner prefix, so no owner's prefix starts another's.
pub(crate) fn owner_prefix(owner_id: &str) -> String {
    format!("{:x}::", Sha256::digest(owner_id.as_bytes()))
}

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize_content(content: &str) -> String {
    let stripped: String = content
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// JSON rendering with object keys sorted at every depth.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redacta_core::WordDifficulty;
    use serde_json::json;

    fn synonym(difficulty: WordDifficulty) -> TransformationConfig {
        TransformationConfig::SynonymEnrichment {
            word_difficulty: difficulty,
        }
    }

    #[test]
    fn test_incidental_formatting_collides() {
        let config = synonym(WordDifficulty::Medium);
        let a = CacheKey::for_transformation("A  educação  é boa.", &config);
        let b = CacheKey::for_transformation("a educação é boa", &config);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_config_and_content_differences_do_not_collide() {
        let medium = CacheKey::for_transformation("texto", &synonym(WordDifficulty::Medium));
        let complex = CacheKey::for_transformation("texto", &synonym(WordDifficulty::Complex));
        let other = CacheKey::for_transformation("outro texto", &synonym(WordDifficulty::Medium));
        assert_ne!(medium, complex);
        assert_ne!(medium, other);
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a = CacheKey::from_parts("x", "op", &json!({"b": 1, "a": {"d": 2, "c": 3}}));
        let b = CacheKey::from_parts("x", "op", &json!({"a": {"c": 3, "d": 2}, "b": 1}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_keys_keep_literal_text() {
        let config = synonym(WordDifficulty::Medium);
        assert_ne!(
            CacheKey::for_prompt("A educação é boa.", &config),
            CacheKey::for_prompt("a educação é boa", &config)
        );
        assert_eq!(
            CacheKey::for_prompt(" A educação é boa. ", &config),
            CacheKey::for_prompt("A educação é boa.", &config)
        );
    }

    #[test]
    fn test_owner_scopes_do_not_nest() {
        let key = CacheKey::from_parts("x", "op", &Value::Null);
        let nested = key.scoped("a::b");
        assert!(!nested.starts_with(&owner_prefix("a")));
        assert!(nested.starts_with(&owner_prefix("a::b")));
        assert_eq!(owner_prefix("a").len(), owner_prefix("a::b").len());
    }

    #[test]
    fn test_normalize_content() {
        assert_eq!(normalize_content("  Olá,   MUNDO!\n"), "olá mundo");
    }
}
