// src/checker/cache.rs
// =============================================================================
// Per-run memoization of link verdicts.
//
// The same affiliate link tends to appear under dozens of videos; probing it
// once per run is enough. Entries are never evicted, and the cache lives as
// long as the AuditRunState that owns it.
//
// Two probes racing on a first-seen URL may both write. That's fine: the
// verdict is a deterministic function of the outcome, and the first write
// is kept.
// =============================================================================

use super::classify::LinkVerdict;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<String, LinkVerdict>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<LinkVerdict> {
        self.entries.get(url).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Stores a verdict unless one is already present, and returns the
    /// authoritative entry.
    pub fn insert(&self, url: String, verdict: LinkVerdict) -> LinkVerdict {
        self.entries.entry(url).or_insert(verdict).value().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
