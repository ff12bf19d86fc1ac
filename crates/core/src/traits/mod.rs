//! Core traits for Redacta.
//!
//! - `llm`: the LLM client contract (LlmClient, LlmResponse)
//! - `heuristics`: swappable scoring/extraction heuristics (QualityScorer, KeywordExtractor)

pub mod heuristics;
pub mod llm;

pub use heuristics::*;
pub use llm::*;
