//! The cache service.

use redacta_core::{
    config::CacheConfig, CachePayload, EssayEvaluation, QualityScorer, TransformationConfig,
};
use serde::Serialize;
use std::sync::Arc;

use crate::key::{owner_prefix, CacheKey};
use crate::quality::HeuristicQualityScorer;
use crate::tier::{CacheEntry, Tier, TierKind};

/// A cache hit, tagged with the tier that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub payload: CachePayload,
    pub tier: TierKind,
}

/// Per-tier counters.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub tier: TierKind,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Total number of entries across tiers.
    pub total_entries: usize,
    /// Total number of cache hits across tiers.
    pub total_hits: u64,
    pub tiers: Vec<TierStats>,
}

/// Multi-tier, content-addressed result cache.
///
/// Lookups check the owner's session tier before the global tier. Every
/// store writes the global tier and, when an owner is given, the session
/// tier too. Each write is followed by an inline cleanup of the tier.
pub struct IntelligentCache {
    session: Tier,
    global: Tier,
    template: Tier,
    result_set: Tier,
    scorer: Arc<dyn QualityScorer>,
}

impl IntelligentCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            session: Tier::new(TierKind::Session, config.session),
            global: Tier::new(TierKind::Global, config.global),
            template: Tier::new(TierKind::Template, config.template),
            result_set: Tier::new(TierKind::ResultSet, config.result_set),
            scorer: Arc::new(HeuristicQualityScorer),
        }
    }

    /// Replace the quality heuristic.
    pub fn with_scorer(mut self, scorer: Arc<dyn QualityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    // =========================================================================
    // Transformation / evaluation results
    // =========================================================================

    pub fn lookup(
        &self,
        content: &str,
        config: &TransformationConfig,
        owner_id: Option<&str>,
    ) -> Option<CacheHit> {
        self.lookup_key(&CacheKey::for_transformation(content, config), owner_id)
    }

    pub fn store(
        &self,
        content: &str,
        config: &TransformationConfig,
        payload: CachePayload,
        owner_id: Option<&str>,
    ) {
        self.store_key(
            &CacheKey::for_transformation(content, config),
            payload,
            owner_id,
        )
    }

    pub fn lookup_evaluation(
        &self,
        essay: &str,
        theme: Option<&str>,
        owner_id: Option<&str>,
    ) -> Option<(EssayEvaluation, TierKind)> {
        let hit = self.lookup_key(&CacheKey::for_evaluation(essay, theme), owner_id)?;
        match hit.payload {
            CachePayload::Evaluation(evaluation) => Some((evaluation, hit.tier)),
            _ => None,
        }
    }

    pub fn store_evaluation(
        &self,
        essay: &str,
        theme: Option<&str>,
        evaluation: EssayEvaluation,
        owner_id: Option<&str>,
    ) {
        self.store_key(
            &CacheKey::for_evaluation(essay, theme),
            CachePayload::Evaluation(evaluation),
            owner_id,
        )
    }

    /// Session tier first (when an owner is given), then global.
    pub fn lookup_key(&self, key: &CacheKey, owner_id: Option<&str>) -> Option<CacheHit> {
        if let Some(owner) = owner_id {
            if let Some(payload) = self.session.get(&key.scoped(owner)) {
                tracing::debug!(tier = "session", key = %key, "Cache hit");
                return Some(CacheHit {
                    payload,
                    tier: TierKind::Session,
                });
            }
        }

        if let Some(payload) = self.global.get(key.as_str()) {
            tracing::debug!(tier = "global", key = %key, "Cache hit");
            return Some(CacheHit {
                payload,
                tier: TierKind::Global,
            });
        }

        tracing::debug!(key = %key, "Cache miss");
        None
    }

    pub fn store_key(&self, key: &CacheKey, payload: CachePayload, owner_id: Option<&str>) {
        let quality = self.scorer.score(&payload);

        if let Some(owner) = owner_id {
            self.session
                .insert(key.scoped(owner), CacheEntry::new(payload.clone(), quality));
        }
        self.global
            .insert(key.as_str().to_string(), CacheEntry::new(payload, quality));

        tracing::debug!(key = %key, quality, owner = owner_id, "Cached result");
    }

    // =========================================================================
    // Template tier
    // =========================================================================

    pub fn lookup_template(&self, name: &str) -> Option<String> {
        match self.template.get(name)? {
            CachePayload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn store_template(&self, name: &str, text: impl Into<String>) {
        let payload = CachePayload::Text(text.into());
        let quality = self.scorer.score(&payload);
        self.template
            .insert(name.to_string(), CacheEntry::new(payload, quality));
    }

    // =========================================================================
    // Result-set tier
    // =========================================================================

    pub fn lookup_list(&self, content: &str, kind: &str) -> Option<Vec<String>> {
        match self.result_set.get(CacheKey::for_list(content, kind).as_str())? {
            CachePayload::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn store_list(&self, content: &str, kind: &str, items: Vec<String>) {
        let payload = CachePayload::List(items);
        let quality = self.scorer.score(&payload);
        self.result_set.insert(
            CacheKey::for_list(content, kind).as_str().to_string(),
            CacheEntry::new(payload, quality),
        );
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Drop every session entry of one owner. Returns the number removed.
    pub fn invalidate_owner(&self, owner_id: &str) -> usize {
        let removed = self.session.remove_prefix(&owner_prefix(owner_id));
        tracing::debug!(owner = owner_id, removed, "Invalidated session entries");
        removed
    }

    /// Run cleanup on every tier. Writes already do this inline.
    pub fn cleanup(&self) {
        for tier in self.tiers() {
            tier.cleanup();
        }
    }

    pub fn clear(&self) {
        for tier in self.tiers() {
            tier.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let tiers: Vec<TierStats> = self
            .tiers()
            .into_iter()
            .map(|tier| {
                let (hits, misses, evictions, expirations) = tier.counters();
                TierStats {
                    tier: tier.kind(),
                    entries: tier.len(),
                    hits,
                    misses,
                    evictions,
                    expirations,
                }
            })
            .collect();

        CacheStats {
            total_entries: tiers.iter().map(|t| t.entries).sum(),
            total_hits: tiers.iter().map(|t| t.hits).sum(),
            tiers,
        }
    }

    fn tiers(&self) -> [&Tier; 4] {
        [&self.session, &self.global, &self.template, &self.result_set]
    }
}

impl Default for IntelligentCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
