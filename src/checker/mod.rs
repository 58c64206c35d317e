// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - extract:  pulls candidate URLs out of free text
// - domain:   internal / whitelisted / tracking predicates
// - http:     probes one URL and reports what happened
// - classify: turns (domain flags, probe outcome) into a verdict
// - cache:    per-run memoization of verdicts
//
// This file (mod.rs) is the module root: it re-exports the pieces the audit
// orchestrator needs so callers write `checker::classify()` rather than
// `checker::classify::classify()`.
// =============================================================================

mod cache;
mod classify;
mod domain;
mod extract;
mod http;

pub use cache::ResultCache;
pub use classify::{classify, LinkVerdict, Verdict};
pub use domain::DomainClassifier;
pub use extract::{extract_urls, normalize_url};
pub use http::{LinkProber, ProbeOutcome};
