// src/audit/orchestrator.rs
// =============================================================================
// Checks one batch of URLs (one description, one comment, ...) concurrently.
//
// Steps:
// 1. Normalize and dedupe, drop internal links
// 2. Probe the URLs not already in the run cache, at most `pool_size` at once
// 3. Wait for the WHOLE batch, classify, write the cache
// 4. Update counters and return the non-Alive verdicts as issues
//
// Callers never see a partial batch.
// =============================================================================

use super::{AuditContext, AuditRunState, Issue};
use crate::checker::{classify, normalize_url, ProbeOutcome};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::info;

pub async fn audit_links(state: &AuditRunState, context: &AuditContext, urls: Vec<String>) -> Vec<Issue> {
    let domains = state.domains();

    let mut seen = HashSet::new();
    let external: Vec<String> = urls
        .iter()
        .map(|u| normalize_url(u))
        .filter(|u| !u.is_empty() && seen.insert(u.clone()))
        .filter(|u| !domains.is_internal(u))
        .collect();

    if external.is_empty() {
        return Vec::new();
    }

    state.stats().record_seen(external.len());

    let fresh: Vec<String> = external
        .iter()
        .filter(|u| !state.cache().contains(u))
        .cloned()
        .collect();

    info!(
        item_id = context.item_id.as_str(),
        source = %context.source_type,
        links = external.len(),
        to_probe = fresh.len(),
        "checking external links"
    );

    // Run up to pool_size probes at once; results arrive in any order
    let probes = fresh.into_iter().map(|url| {
        let prober = state.prober();
        async move {
            let outcome = prober.probe(&url).await;
            (url, outcome)
        }
    });
    let outcomes: Vec<(String, ProbeOutcome)> = stream::iter(probes)
        .buffer_unordered(state.config().pool_size.max(1))
        .collect()
        .await;

    for (url, outcome) in outcomes {
        if let Some(verdict) = classify(domains.flags(&url), &outcome) {
            state.cache().insert(url, verdict);
        }
    }

    let mut issues = Vec::new();
    let mut ok = 0;
    for url in external {
        // Only internal URLs go unclassified, and those were dropped above
        match state.cache().get(&url) {
            Some(found) if found.verdict.is_issue() => {
                issues.push(Issue::for_link(context, url, &found));
            }
            _ => ok += 1,
        }
    }

    state.stats().record_links(ok, issues.len());
    issues
}
