// src/traits.rs
// =============================================================================
// Seams between the audit core and the outside world.
//
// The core only ever talks to the network through these three traits:
// - Prober:         fetch one outbound link (checker::LinkProber)
// - PageFetcher:    raw watch page text for end screen extraction
// - LivenessLookup: "which of these ids still exist?" via the read API
//
// Keeping them as trait objects lets tests swap in scripted fakes without a
// network, and lets the binary wire in the YouTube implementations.
// =============================================================================

use crate::checker::ProbeOutcome;
use crate::endcard::ReferenceKind;
use crate::error::ApiResult;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait Prober: Send + Sync {
    /// Never fails: every transport problem is folded into the outcome
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, item_id: &str) -> ApiResult<String>;
}

#[async_trait]
pub trait LivenessLookup: Send + Sync {
    /// Returns the subset of `ids` that still exist. Callers keep batches
    /// at or below `MAX_LOOKUP_BATCH`.
    async fn existing(&self, kind: ReferenceKind, ids: &[String]) -> ApiResult<HashSet<String>>;
}

/// The Data API accepts at most 50 ids per list call
pub const MAX_LOOKUP_BATCH: usize = 50;
