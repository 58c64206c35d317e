// src/endcard/mod.rs
// =============================================================================
// End screen ("end-card") auditing.
//
// Submodules:
// - payload:  pulls typed references out of a watch page
// - resolver: checks those references against the read API, with memoization
// =============================================================================

mod payload;
mod resolver;

pub use payload::{parse_end_cards, EndCardData};
pub use resolver::EndCardResolver;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Video,
    Playlist,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Video => f.write_str("video"),
            ReferenceKind::Playlist => f.write_str("playlist"),
        }
    }
}

/// An explicit pointer found in an end screen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndCardRef {
    pub kind: ReferenceKind,
    pub target_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    Alive,
    Dead,
    /// The lookup failed; no verdict either way
    Unknown,
}

/// A reference together with what the read API said about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndCardReference {
    pub kind: ReferenceKind,
    pub target_id: String,
    pub liveness: Liveness,
}
