// src/youtube/mod.rs
// =============================================================================
// This module talks to YouTube: the Data API for metadata and liveness
// lookups, and the public watch page for end screen payloads.
//
// It is a collaborator of the audit core, not part of it: everything here
// either produces ContentItems or implements a trait from traits.rs.
// =============================================================================

mod client;
mod duration;
mod items;
mod page;

pub use client::{VideoInfo, YouTubeClient};
pub use items::{build_video_item, channel_item, load_videos};
pub use page::WatchPageFetcher;
