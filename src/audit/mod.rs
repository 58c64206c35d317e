// src/audit/mod.rs
// =============================================================================
// The audit core: run state, per-item auditing, and the link orchestrator.
//
// Submodules:
// - state:        AuditRunState (caches, counters, issues), run_audit(),
//                 finalize_report()
// - orchestrator: fans one batch of URLs across the bounded probe pool
//
// The types below are what flows in from the collaborators (ContentItem) and
// out to the report (Issue, StatsSnapshot, RunReport).
// =============================================================================

mod orchestrator;
mod state;

pub use orchestrator::audit_links;
pub use state::{AuditRunState, RunReport};
#[cfg(test)]
pub use state::StatsSnapshot;

use crate::checker::{LinkVerdict, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a piece of text (or a reference) came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    ChannelDescription,
    Description,
    Comment,
    EndCard,
    /// Text passed straight on the command line
    Input,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceType::ChannelDescription => "Channel description",
            SourceType::Description => "Description",
            SourceType::Comment => "Comment",
            SourceType::EndCard => "End screen",
            SourceType::Input => "Input",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Channel,
    Video,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlob {
    pub source_type: SourceType,
    pub text: String,
}

impl TextBlob {
    pub fn new(source_type: SourceType, text: impl Into<String>) -> Self {
        TextBlob { source_type, text: text.into() }
    }
}

/// One thing to audit, as handed over by the metadata collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub kind: ItemKind,
    pub text_blobs: Vec<TextBlob>,
}

/// Tags every issue produced while auditing one text blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub item_id: String,
    pub title: String,
    pub source_type: SourceType,
}

impl AuditContext {
    pub fn for_item(item: &ContentItem, source_type: SourceType) -> Self {
        AuditContext {
            item_id: item.id.clone(),
            title: item.title.clone(),
            source_type,
        }
    }
}

/// One reportable finding: a link or end screen reference that isn't Alive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub item_id: String,
    pub title: String,
    pub source_type: SourceType,
    /// The URL, or the end screen target id
    pub target: String,
    pub verdict: Verdict,
    pub reason: String,
    /// HTTP status behind the verdict, when the server answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl Issue {
    pub fn new(context: &AuditContext, target: impl Into<String>, verdict: Verdict, reason: impl Into<String>) -> Self {
        Issue {
            item_id: context.item_id.clone(),
            title: context.title.clone(),
            source_type: context.source_type,
            target: target.into(),
            verdict,
            reason: reason.into(),
            status: None,
        }
    }

    /// An issue for a classified link; the reason stays bare, the status
    /// code is carried separately.
    pub fn for_link(context: &AuditContext, url: impl Into<String>, found: &LinkVerdict) -> Self {
        Issue {
            status: found.status,
            ..Issue::new(context, url, found.verdict, found.reason.to_string())
        }
    }

    /// Report wording, e.g. "403 - blocked, no evidence of content"
    pub fn describe(&self) -> String {
        match self.status {
            Some(code) => format!("{} - {}", code, self.reason),
            None => self.reason.clone(),
        }
    }
}
