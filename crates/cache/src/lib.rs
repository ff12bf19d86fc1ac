//! Intelligent multi-tier cache for Redacta.
//!
//! Results are content-addressed by a semantic hash, so requests that only
//! differ in casing, punctuation or spacing collide on the same entry.
//! Four independently-policied tiers are kept:
//!
//! - `session`: owner-scoped, checked first
//! - `global`: shared semantic tier
//! - `template`: rendered prompt templates
//! - `result_set`: lists such as vocabulary suggestions

pub mod cache;
pub mod key;
pub mod quality;
pub mod tier;

pub use cache::{CacheHit, CacheStats, IntelligentCache, TierStats};
pub use key::CacheKey;
pub use quality::HeuristicQualityScorer;
pub use tier::TierKind;
