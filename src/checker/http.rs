// src/checker/http.rs
// =============================================================================
// This module probes a single URL over HTTP.
//
// Key functionality:
// - Makes a streamed GET with browser-like headers (a random profile per probe)
// - Reads only the first few KB of the body, enough to spot a <title>
// - Skips TLS verification: targets are arbitrary third-party sites
// - Maps every transport failure into a small typed set (ProbeOutcome)
//
// The prober never decides whether a link is dead. It reports what happened
// and classify.rs makes the call.
// =============================================================================

use crate::config::{AuditConfig, HeaderProfile};
use crate::traits::Prober;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use std::error::Error as StdError;
use std::sync::LazyLock;
use tracing::debug;

/// Fragments that show up in resolver errors across platforms
const DNS_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
    "no address associated",
];

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

/// What happened when we fetched a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered (any status)
    Completed { status: u16, has_title: bool },
    /// The request hit the per-probe timeout
    Timeout,
    /// The host name could not be resolved
    DnsFailure,
    /// TCP/TLS connection could not be established
    ConnectFailure(String),
    /// Anything else (redirect loops, protocol errors, ...)
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct LinkProber {
    client: Client,
    profiles: Vec<HeaderProfile>,
    body_limit: usize,
}

impl LinkProber {
    // Builds the shared HTTP client
    //
    // The client is created once per run and cloned into every probe task;
    // cloning is cheap because the connection pool is reference counted.
    pub fn new(config: &AuditConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(LinkProber {
            client,
            profiles: config.header_profiles.clone(),
            body_limit: config.body_limit,
        })
    }

    // Picks one header profile at random
    //
    // Kept out of probe() so the thread-local RNG never lives across an await.
    fn pick_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(profile) = self.profiles.choose(&mut rand::rng()) else {
            return headers;
        };

        let pairs = [
            (USER_AGENT, profile.user_agent.as_str()),
            (ACCEPT, profile.accept.as_str()),
            (ACCEPT_LANGUAGE, profile.accept_language.as_str()),
        ];
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        headers
    }
}

#[async_trait]
impl Prober for LinkProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let request = self.client.get(url).headers(self.pick_headers());

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let snippet = read_snippet(response, self.body_limit).await;
                let has_title = has_title_element(&snippet);
                debug!(url, status, has_title, "probe completed");
                ProbeOutcome::Completed { status, has_title }
            }
            Err(e) => {
                let outcome = categorize_error(&e);
                debug!(url, ?outcome, "probe failed");
                outcome
            }
        }
    }
}

// Reads at most `limit` bytes of the body
//
// A failure mid-body still counts as a completed request: the status line
// already arrived, so we keep whatever was read.
async fn read_snippet(mut response: Response, limit: usize) -> String {
    let mut buf: Vec<u8> = Vec::with_capacity(limit.min(16 * 1024));

    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = (limit - buf.len()).min(chunk.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "body read interrupted");
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// True when the (possibly truncated) HTML contains a <title> element
pub fn has_title_element(html: &str) -> bool {
    if html.is_empty() {
        return false;
    }
    let document = Html::parse_document(html);
    let found = document.select(&TITLE_SELECTOR).next().is_some();
    found
}

// Sorts a reqwest error into our typed outcomes
//
// reqwest doesn't expose a "DNS failed" flag, so we walk the error's source
// chain looking for the resolver's message.
fn categorize_error(error: &reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        ProbeOutcome::Timeout
    } else if is_dns_failure(error) {
        ProbeOutcome::DnsFailure
    } else if error.is_connect() {
        ProbeOutcome::ConnectFailure(root_cause(error))
    } else if error.is_redirect() {
        ProbeOutcome::Transport("too many redirects".to_string())
    } else {
        ProbeOutcome::Transport(root_cause(error))
    }
}

fn is_dns_failure(error: &reqwest::Error) -> bool {
    let mut source: Option<&dyn StdError> = Some(error);
    while let Some(err) = source {
        let text = err.to_string().to_lowercase();
        if DNS_MARKERS.iter().any(|marker| text.contains(marker)) {
            return true;
        }
        source = err.source();
    }
    false
}

// The innermost error message is usually the useful one
// ("Connection refused", "invalid certificate", ...)
fn root_cause(error: &reqwest::Error) -> String {
    let mut current: &dyn StdError = error;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
