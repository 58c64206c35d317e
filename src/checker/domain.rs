// src/checker/domain.rs
// =============================================================================
// Pure predicates about a URL's host. No network access happens here.
//
// - internal:  the platform's own domains, never audited
// - whitelist: big social/platform hosts that block bots but are not dead
// - tracking:  click-tracking/redirect services that reject naive probes
//
// Domain lists match the host exactly or as a parent domain, so
// "m.facebook.com" is whitelisted but "notfacebook.com" is not. Tracking
// keywords are plain substrings of the whole URL because they describe
// paths and query strings ("ref=", "click") as well as hosts.
// =============================================================================

use crate::config::AuditConfig;
use url::Url;

/// The classifier-relevant facts about one URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainFlags {
    pub internal: bool,
    pub whitelisted: bool,
    pub tracking: bool,
}

#[derive(Debug, Clone)]
pub struct DomainClassifier {
    internal: Vec<String>,
    whitelist: Vec<String>,
    tracking: Vec<String>,
}

impl DomainClassifier {
    pub fn new(config: &AuditConfig) -> Self {
        DomainClassifier {
            internal: lowercase_all(&config.internal_domains),
            whitelist: lowercase_all(&config.whitelist_domains),
            tracking: lowercase_all(&config.tracking_keywords),
        }
    }

    pub fn is_internal(&self, url: &str) -> bool {
        host_of(url).is_some_and(|host| host_matches(&host, &self.internal))
    }

    pub fn is_whitelisted(&self, url: &str) -> bool {
        host_of(url).is_some_and(|host| host_matches(&host, &self.whitelist))
    }

    pub fn is_tracking_redirector(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.tracking.iter().any(|kw| url.contains(kw.as_str()))
    }

    pub fn flags(&self, url: &str) -> DomainFlags {
        DomainFlags {
            internal: self.is_internal(url),
            whitelisted: self.is_whitelisted(url),
            tracking: self.is_tracking_redirector(url),
        }
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect()
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_lowercase())
}

// "www.example.com" -> matches "example.com"
// "shop.example.com" -> matches "example.com"
// "badexample.com"  -> does not match "example.com"
fn host_matches(host: &str, domains: &[String]) -> bool {
    domains.iter().any(|domain| {
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
