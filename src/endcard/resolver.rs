// src/endcard/resolver.rs
// =============================================================================
// Resolves end screen references to Alive / Dead.
//
// Per item:
//   fetch page -> parse payload -> explicit references
//   -> look up ids not seen before this run (batched per kind)
//   -> ids missing from the lookup result are Dead
//
// Lookups are memoized by (kind, id) for the whole run, the same way link
// verdicts are. A failed lookup is logged and NOT cached: those references
// stay Unknown and produce no issue.
// =============================================================================

use super::{parse_end_cards, EndCardData, EndCardRef, EndCardReference, Liveness, ReferenceKind};
use crate::traits::{LivenessLookup, PageFetcher, MAX_LOOKUP_BATCH};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct EndCardResolver {
    fetcher: Arc<dyn PageFetcher>,
    lookup: Arc<dyn LivenessLookup>,
    known: DashMap<(ReferenceKind, String), bool>,
}

impl EndCardResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, lookup: Arc<dyn LivenessLookup>) -> Self {
        EndCardResolver {
            fetcher,
            lookup,
            known: DashMap::new(),
        }
    }

    // Fetches and resolves the end screen of one item
    //
    // Returns an empty list when the page can't be fetched (logged) or has
    // no end screen data.
    pub async fn references_for(&self, item_id: &str) -> Vec<EndCardReference> {
        let page = match self.fetcher.fetch_page(item_id).await {
            Ok(page) => page,
            Err(e) => {
                warn!(item_id, error = %e, "could not fetch watch page, skipping end screen");
                return Vec::new();
            }
        };

        match parse_end_cards(&page) {
            EndCardData::NoEndCardData => {
                debug!(item_id, "no end screen data");
                Vec::new()
            }
            EndCardData::References(refs) => self.resolve(refs).await,
        }
    }

    pub async fn resolve(&self, refs: Vec<EndCardRef>) -> Vec<EndCardReference> {
        for kind in [ReferenceKind::Video, ReferenceKind::Playlist] {
            let mut seen = HashSet::new();
            let pending: Vec<String> = refs
                .iter()
                .filter(|r| r.kind == kind)
                .filter(|r| !self.known.contains_key(&(kind, r.target_id.clone())))
                .filter(|r| seen.insert(r.target_id.clone()))
                .map(|r| r.target_id.clone())
                .collect();

            for batch in pending.chunks(MAX_LOOKUP_BATCH) {
                self.lookup_batch(kind, batch).await;
            }
        }

        refs.into_iter()
            .map(|r| {
                let liveness = match self.known.get(&(r.kind, r.target_id.clone())) {
                    Some(entry) if *entry.value() => Liveness::Alive,
                    Some(_) => Liveness::Dead,
                    None => Liveness::Unknown,
                };
                EndCardReference { kind: r.kind, target_id: r.target_id, liveness }
            })
            .collect()
    }

    async fn lookup_batch(&self, kind: ReferenceKind, ids: &[String]) {
        match self.lookup.existing(kind, ids).await {
            Ok(existing) => {
                for id in ids {
                    self.known
                        .entry((kind, id.clone()))
                        .or_insert(existing.contains(id));
                }
            }
            Err(e) => {
                warn!(%kind, count = ids.len(), error = %e, "end screen lookup failed");
            }
        }
    }

    /// Number of distinct references resolved so far in this run
    pub fn resolved_count(&self) -> usize {
        self.known.len()
    }
}
