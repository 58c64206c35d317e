// src/audit/state.rs
// =============================================================================
// AuditRunState: everything that lives for exactly one audit run.
//
// Created at run start, shared (by reference or Arc) with every component,
// dropped at run end. It owns:
// - the configuration and domain classifier
// - the prober (and, optionally, the end screen resolver)
// - the link result cache
// - monotonic counters (atomics, safe to bump from concurrent probes)
// - every issue reported so far
//
// Public entry points:
// - run_audit(item)   -> issues for that item + a stats snapshot
// - finalize_report() -> the whole run's stats and issues
// =============================================================================

use super::{audit_links, AuditContext, ContentItem, Issue, ItemKind, SourceType};
use crate::checker::{extract_urls, DomainClassifier, ResultCache, Verdict};
use crate::config::AuditConfig;
use crate::endcard::{EndCardResolver, Liveness};
use crate::traits::Prober;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Run-wide counters. They only ever go up.
#[derive(Debug, Default)]
pub struct Stats {
    items_scanned: AtomicU64,
    links_seen: AtomicU64,
    links_ok: AtomicU64,
    links_error: AtomicU64,
    end_card_issues: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub items_scanned: u64,
    pub links_seen: u64,
    pub links_ok: u64,
    pub links_error: u64,
    pub end_card_issues: u64,
}

impl Stats {
    pub fn record_item(&self) {
        self.items_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_seen(&self, count: usize) {
        self.links_seen.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_links(&self, ok: usize, errors: usize) {
        self.links_ok.fetch_add(ok as u64, Ordering::Relaxed);
        self.links_error.fetch_add(errors as u64, Ordering::Relaxed);
    }

    pub fn record_end_card_issues(&self, count: usize) {
        self.end_card_issues.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            items_scanned: self.items_scanned.load(Ordering::Relaxed),
            links_seen: self.links_seen.load(Ordering::Relaxed),
            links_ok: self.links_ok.load(Ordering::Relaxed),
            links_error: self.links_error.load(Ordering::Relaxed),
            end_card_issues: self.end_card_issues.load(Ordering::Relaxed),
        }
    }
}

/// What run_audit() hands back for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub issues: Vec<Issue>,
    pub stats: StatsSnapshot,
}

/// The whole run, as handed to the reporting side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub stats: StatsSnapshot,
    /// Distinct external URLs classified during the run
    pub unique_links: usize,
    pub issues: Vec<Issue>,
}

impl RunReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

pub struct AuditRunState {
    config: AuditConfig,
    domains: DomainClassifier,
    prober: Arc<dyn Prober>,
    end_cards: Option<EndCardResolver>,
    cache: ResultCache,
    stats: Stats,
    issues: Mutex<Vec<Issue>>,
}

impl AuditRunState {
    pub fn new(config: AuditConfig, prober: Arc<dyn Prober>) -> Self {
        AuditRunState {
            domains: DomainClassifier::new(&config),
            config,
            prober,
            end_cards: None,
            cache: ResultCache::new(),
            stats: Stats::default(),
            issues: Mutex::new(Vec::new()),
        }
    }

    /// Enables end screen auditing for video items
    pub fn with_end_cards(mut self, resolver: EndCardResolver) -> Self {
        self.end_cards = Some(resolver);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn domains(&self) -> &DomainClassifier {
        &self.domains
    }

    pub fn prober(&self) -> Arc<dyn Prober> {
        Arc::clone(&self.prober)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    // Audits every text blob of one item, then its end screen
    //
    // Text blobs are checked one batch at a time; each batch runs its
    // probes concurrently. Issues are also appended to the run-wide list.
    pub async fn run_audit(&self, item: &ContentItem) -> ItemReport {
        self.stats.record_item();
        debug!(item_id = item.id.as_str(), title = item.title.as_str(), "auditing item");

        let mut issues = Vec::new();
        for blob in &item.text_blobs {
            let urls = extract_urls(&blob.text);
            if urls.is_empty() {
                continue;
            }
            let context = AuditContext::for_item(item, blob.source_type);
            issues.extend(audit_links(self, &context, urls).await);
        }

        if item.kind == ItemKind::Video {
            if let Some(resolver) = &self.end_cards {
                let end_card_issues = self.audit_end_cards(resolver, item).await;
                self.stats.record_end_card_issues(end_card_issues.len());
                issues.extend(end_card_issues);
            }
        }

        if !issues.is_empty() {
            info!(item_id = item.id.as_str(), issues = issues.len(), "item has issues");
            self.lock_issues().extend(issues.iter().cloned());
        }

        ItemReport {
            issues,
            stats: self.stats.snapshot(),
        }
    }

    async fn audit_end_cards(&self, resolver: &EndCardResolver, item: &ContentItem) -> Vec<Issue> {
        let context = AuditContext::for_item(item, SourceType::EndCard);
        resolver
            .references_for(&item.id)
            .await
            .into_iter()
            .filter(|r| r.liveness == Liveness::Dead)
            .map(|r| Issue::new(&context, r.target_id, Verdict::Dead, format!("{} no longer exists", r.kind)))
            .collect()
    }

    pub fn finalize_report(&self) -> RunReport {
        if let Some(resolver) = &self.end_cards {
            debug!(references = resolver.resolved_count(), "end screen references resolved");
        }
        RunReport {
            stats: self.stats.snapshot(),
            unique_links: self.cache.len(),
            issues: self.lock_issues().clone(),
        }
    }

    // A panic while holding the lock can't leave the Vec half-written,
    // so a poisoned lock is still usable.
    fn lock_issues(&self) -> std::sync::MutexGuard<'_, Vec<Issue>> {
        self.issues.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
