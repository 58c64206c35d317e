// src/config.rs
// =============================================================================
// Tunables for an audit run.
//
// Everything the link classifier and prober depend on lives here as plain
// data: pool size, probe timeout, how much body to read, and the domain /
// keyword lists. The CLI builds one of these (see cli.rs) and hands it to the
// AuditRunState; tests build them directly with AuditConfig::default().
// =============================================================================

use std::time::Duration;

/// Hosts that belong to the platform itself. Links to them are never audited.
pub const DEFAULT_INTERNAL_DOMAINS: &[&str] = &["youtube.com", "youtu.be", "google.com"];

/// Hosts presumed reachable even when a probe is blocked or refused.
pub const DEFAULT_WHITELIST_DOMAINS: &[&str] = &[
    "facebook.com",
    "fb.me",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
    "tiktok.com",
    "t.me",
    "zalo.me",
    "youtube.com",
    "youtu.be",
    "google.com",
];

/// Substrings that mark click-tracking and redirect services.
pub const DEFAULT_TRACKING_KEYWORDS: &[&str] = &[
    "pipaffiliates",
    "affiliate",
    "clicks.",
    "track.",
    "go.",
    "bit.ly",
    "tinyurl",
    "ref=",
    "click",
    "partner",
    "redirect",
];

pub const DEFAULT_POOL_SIZE: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BODY_LIMIT: usize = 8 * 1024;

/// One browser-like set of request headers. A profile is picked at random
/// for every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl HeaderProfile {
    fn browser(user_agent: &str) -> Self {
        HeaderProfile {
            user_agent: user_agent.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

pub fn default_header_profiles() -> Vec<HeaderProfile> {
    vec![
        HeaderProfile::browser(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        ),
        HeaderProfile::browser(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
        HeaderProfile::browser(
            "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0",
        ),
    ]
}

/// Configuration for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Maximum number of probes in flight for one batch
    pub pool_size: usize,
    /// Whole-request bound for a single probe (connect + headers + body)
    pub timeout: Duration,
    /// How many body bytes to read while looking for a <title>
    pub body_limit: usize,
    pub internal_domains: Vec<String>,
    pub whitelist_domains: Vec<String>,
    pub tracking_keywords: Vec<String>,
    pub header_profiles: Vec<HeaderProfile>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            pool_size: DEFAULT_POOL_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            body_limit: DEFAULT_BODY_LIMIT,
            internal_domains: to_owned_list(DEFAULT_INTERNAL_DOMAINS),
            whitelist_domains: to_owned_list(DEFAULT_WHITELIST_DOMAINS),
            tracking_keywords: to_owned_list(DEFAULT_TRACKING_KEYWORDS),
            header_profiles: default_header_profiles(),
        }
    }
}

pub fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Which parts of a channel get scanned. These differ between deployments,
/// so they are options rather than fixed behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Scan the channel's own description
    pub channel_description: bool,
    /// Number of top comments sampled per video (0 = skip comments)
    pub comments: u32,
    /// Resolve end screen references
    pub end_cards: bool,
    /// Skip videos at or below this duration (short-form content)
    pub min_duration_secs: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            channel_description: true,
            comments: 10,
            end_cards: true,
            min_duration_secs: None,
        }
    }
}
