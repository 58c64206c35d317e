// src/checker/classify.rs
// =============================================================================
// Turns a raw probe outcome into a verdict.
//
// Status codes and transport errors on the open web are ambiguous: a 403 may
// be a deleted page or a bot wall, a refused connection may be a dead host or
// a firewall. Only two signals are trusted on their own:
//
//   - 404 / 410               -> the page is gone
//   - the domain won't resolve -> the site is gone
//
// Everything else is rescued when there is evidence the target is real (a
// whitelisted host, a tracking redirector, or a <title> in the body).
//
// This function is pure: same (flags, outcome) in, same verdict out.
// =============================================================================

use super::domain::DomainFlags;
use super::http::ProbeOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status codes typically emitted by bot defenses rather than true absence
pub const ANTI_BOT_STATUSES: &[u16] = &[400, 401, 403, 406, 429, 503, 999];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Alive,
    Dead,
    Warning,
    Error,
}

impl Verdict {
    /// Alive results are silent; everything else ends up in the report
    pub fn is_issue(self) -> bool {
        !matches!(self, Verdict::Alive)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Alive => "ALIVE",
            Verdict::Dead => "DEAD",
            Verdict::Warning => "WARNING",
            Verdict::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Why a verdict was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum Reason {
    /// 2xx or 3xx
    Reachable,
    /// Anti-bot status but the host is whitelisted
    TrustedHost,
    /// Anti-bot status but the body had a <title>
    ContentObserved,
    /// Timeout or refused connection on a trusted/tracking URL
    ProtectedEndpoint,
    NotFound,
    BlockedNoContent,
    UnexpectedStatus,
    Timeout,
    DomainUnresolvable,
    ConnectionFailed,
    Transport(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Reachable => f.write_str("reachable"),
            Reason::TrustedHost => f.write_str("blocked, trusted host"),
            Reason::ContentObserved => f.write_str("blocked, page content observed"),
            Reason::ProtectedEndpoint => f.write_str("protected endpoint presumed active"),
            Reason::NotFound => f.write_str("not found"),
            Reason::BlockedNoContent => f.write_str("blocked, no evidence of content"),
            Reason::UnexpectedStatus => f.write_str("unexpected status"),
            Reason::Timeout => f.write_str("timeout"),
            Reason::DomainUnresolvable => f.write_str("domain no longer resolves"),
            Reason::ConnectionFailed => f.write_str("connection failed"),
            Reason::Transport(detail) => write!(f, "transport error: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkVerdict {
    pub verdict: Verdict,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl LinkVerdict {
    fn new(verdict: Verdict, reason: Reason, status: Option<u16>) -> Self {
        LinkVerdict { verdict, reason, status }
    }
}

// Applies the decision table.
//
// Returns None for internal URLs: they are excluded, not classified.
pub fn classify(flags: DomainFlags, outcome: &ProbeOutcome) -> Option<LinkVerdict> {
    if flags.internal {
        return None;
    }

    let rescued = flags.whitelisted || flags.tracking;

    let verdict = match outcome {
        ProbeOutcome::Completed { status, has_title } => {
            let status = *status;
            let code = Some(status);
            if (200..400).contains(&status) {
                LinkVerdict::new(Verdict::Alive, Reason::Reachable, code)
            } else if status == 404 || status == 410 {
                LinkVerdict::new(Verdict::Dead, Reason::NotFound, code)
            } else if ANTI_BOT_STATUSES.contains(&status) {
                if flags.whitelisted {
                    LinkVerdict::new(Verdict::Alive, Reason::TrustedHost, code)
                } else if *has_title {
                    LinkVerdict::new(Verdict::Alive, Reason::ContentObserved, code)
                } else {
                    LinkVerdict::new(Verdict::Dead, Reason::BlockedNoContent, code)
                }
            } else {
                LinkVerdict::new(Verdict::Warning, Reason::UnexpectedStatus, code)
            }
        }
        ProbeOutcome::Timeout if rescued => {
            LinkVerdict::new(Verdict::Alive, Reason::ProtectedEndpoint, None)
        }
        ProbeOutcome::Timeout => LinkVerdict::new(Verdict::Error, Reason::Timeout, None),
        // A vanished domain can't be a bot wall, so nothing rescues it
        ProbeOutcome::DnsFailure => {
            LinkVerdict::new(Verdict::Dead, Reason::DomainUnresolvable, None)
        }
        ProbeOutcome::ConnectFailure(_) if rescued => {
            LinkVerdict::new(Verdict::Alive, Reason::ProtectedEndpoint, None)
        }
        ProbeOutcome::ConnectFailure(_) => {
            LinkVerdict::new(Verdict::Error, Reason::ConnectionFailed, None)
        }
        ProbeOutcome::Transport(detail) => {
            LinkVerdict::new(Verdict::Error, Reason::Transport(detail.clone()), None)
        }
    };

    Some(verdict)
}
