//! Prompt builder for Redacta.
//!
//! Maps `(text, config)` to a compact instruction string. Pure and
//! deterministic: identical input always renders the identical prompt.

pub mod builder;
pub mod labels;

pub use builder::PromptBuilder;
