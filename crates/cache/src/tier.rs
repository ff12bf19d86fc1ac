//! A single independently-policied cache map.

use dashmap::DashMap;
use redacta_core::{config::TierConfig, CachePayload};
use serde::Serialize;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    Session,
    Global,
    Template,
    ResultSet,
}

impl TierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Global => "global",
            Self::Template => "template",
            Self::ResultSet => "result_set",
        }
    }
}

/// Cache entry with usage bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub payload: CachePayload,
    pub created_at: Instant,
    pub last_access_at: Instant,
    pub usage_count: u64,
    pub quality_score: f64,
}

impl CacheEntry {
    pub fn new(payload: CachePayload, quality_score: f64) -> Self {
        let now = Instant::now();
        Self {
            payload,
            created_at: now,
            last_access_at: now,
            usage_count: 0,
            quality_score,
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created_at.elapsed() > ttl)
    }

    /// Eviction rank. Higher survives.
    pub fn rank(&self) -> f64 {
        self.quality_score + self.usage_count as f64
    }

    fn touch(&mut self) {
        self.usage_count += 1;
        self.last_access_at = Instant::now();
    }
}

/// Result of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CleanupReport {
    pub expired: usize,
    pub evicted: usize,
}

pub(crate) struct Tier {
    kind: TierKind,
    policy: TierConfig,
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl Tier {
    pub fn new(kind: TierKind, policy: TierConfig) -> Self {
        Self {
            kind,
            policy,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> TierKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fetch a live entry, bumping its usage. Expired entries are purged here.
    pub fn get(&self, key: &str) -> Option<CachePayload> {
        let ttl = self.policy.ttl();

        let expired = match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(ttl) => {
                entry.touch();
                self.record(&self.hits, "hit");
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        // The guard above must be dropped before removing from the same shard.
        if expired && self.entries.remove_if(key, |_, e| e.is_expired(ttl)).is_some() {
            self.record(&self.expirations, "expired");
        }
        self.record(&self.misses, "miss");
        None
    }

    /// Insert (or replace) an entry, then clean up inline.
    pub fn insert(&self, key: String, entry: CacheEntry) -> CleanupReport {
        self.entries.insert(key, entry);
        metrics::counter!(
            "redacta_cache_events_total",
            "tier" => self.kind.as_str(),
            "event" => "store"
        )
        .increment(1);
        self.cleanup()
    }

    /// Drop expired entries; if the tier still exceeds its bound, keep only the
    /// top `0.8 × max` by `quality + usage` (most recent access breaks ties).
    pub fn cleanup(&self) -> CleanupReport {
        let ttl = self.policy.ttl();
        let mut report = CleanupReport::default();

        if ttl.is_some() {
            let before = self.entries.len();
            self.entries.retain(|_, entry| !entry.is_expired(ttl));
            report.expired = before.saturating_sub(self.entries.len());
        }

        if self.entries.len() > self.policy.max_entries {
            // floor(0.8 × max)
            let keep = self.policy.max_entries * 4 / 5;

            let mut ranked: Vec<(String, f64, Instant)> = self
                .entries
                .iter()
                .map(|e| (e.key().clone(), e.rank(), e.last_access_at))
                .collect();
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(CmpOrdering::Equal)
                    .then_with(|| b.2.cmp(&a.2))
            });

            for (key, _, _) in ranked.into_iter().skip(keep) {
                if self.entries.remove(&key).is_some() {
                    report.evicted += 1;
                }
            }
        }

        if report.expired > 0 {
            self.expirations
                .fetch_add(report.expired as u64, Ordering::Relaxed);
        }
        if report.evicted > 0 {
            self.evictions
                .fetch_add(report.evicted as u64, Ordering::Relaxed);
            metrics::counter!(
                "redacta_cache_events_total",
                "tier" => self.kind.as_str(),
                "event" => "evicted"
            )
            .increment(report.evicted as u64);
            tracing::debug!(
                tier = self.kind.as_str(),
                evicted = report.evicted,
                remaining = self.entries.len(),
                "Cache tier trimmed"
            );
        }
        report
    }

    /// Remove every key starting with `prefix`. Returns the number removed.
    pub fn remove_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn counters(&self) -> (u64, u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.evictions.load(Ordering::Relaxed),
            self.expirations.load(Ordering::Relaxed),
        )
    }

    #[cfg(test)]
    pub fn ranks(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.rank()).collect()
    }

    fn record(&self, counter: &AtomicU64, event: &'static str) {
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(
            "redacta_cache_events_total",
            "tier" => self.kind.as_str(),
            "event" => event
        )
        .increment(1);
    }
}
