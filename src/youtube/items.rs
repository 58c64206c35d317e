// src/youtube/items.rs
// =============================================================================
// Turns Data API resources into ContentItems for the audit core.
//
// Failures here are item-level: a batch of video metadata that fails to load,
// or comments that can't be fetched (often because they're disabled), are
// logged and skipped. The run carries on with what it has.
// =============================================================================

use super::client::{ChannelInfo, VideoInfo, YouTubeClient};
use crate::audit::{ContentItem, ItemKind, SourceType, TextBlob};
use crate::config::ScanOptions;
use crate::error::ApiResult;
use crate::traits::MAX_LOOKUP_BATCH;
use tracing::{info, warn};

pub fn channel_item(channel: &ChannelInfo) -> ContentItem {
    ContentItem {
        id: channel.id.clone(),
        title: channel.title.clone(),
        kind: ItemKind::Channel,
        text_blobs: vec![TextBlob::new(SourceType::ChannelDescription, channel.description.clone())],
    }
}

pub fn video_item(video: &VideoInfo, comments: Vec<String>) -> ContentItem {
    let mut text_blobs = vec![TextBlob::new(SourceType::Description, video.description.clone())];
    text_blobs.extend(comments.into_iter().map(|c| TextBlob::new(SourceType::Comment, c)));

    ContentItem {
        id: video.id.clone(),
        title: video.title.clone(),
        kind: ItemKind::Video,
        text_blobs,
    }
}

/// Short-form detection by duration alone
pub fn is_short_form(video: &VideoInfo, min_duration_secs: Option<u64>) -> bool {
    min_duration_secs.is_some_and(|min| video.duration_secs <= min)
}

// Loads metadata for a list of video ids, 50 at a time
//
// A failed batch is logged and skipped. If every batch fails the source
// itself is unusable (bad key, quota, outage) and the last error is
// returned instead of an empty list.
//
// Videos at or below the configured minimum duration are dropped.
pub async fn load_videos(client: &YouTubeClient, ids: &[String], options: &ScanOptions) -> ApiResult<Vec<VideoInfo>> {
    let mut videos = Vec::new();
    let mut loaded_batches = 0;
    let mut last_error = None;

    for batch in ids.chunks(MAX_LOOKUP_BATCH) {
        match client.videos(batch).await {
            Ok(found) => {
                loaded_batches += 1;
                videos.extend(found);
            }
            Err(e) => {
                warn!(count = batch.len(), error = %e, "could not load video metadata, skipping batch");
                last_error = Some(e);
            }
        }
    }

    if let Some(e) = last_error {
        if loaded_batches == 0 {
            return Err(e);
        }
    }

    let before = videos.len();
    videos.retain(|v| !is_short_form(v, options.min_duration_secs));
    if videos.len() < before {
        info!(skipped = before - videos.len(), "skipped short-form videos");
    }

    Ok(videos)
}

/// Builds the item for one video, sampling its top comments if enabled
pub async fn build_video_item(client: &YouTubeClient, video: &VideoInfo, options: &ScanOptions) -> ContentItem {
    let comments = if options.comments == 0 {
        Vec::new()
    } else {
        match client.top_comments(&video.id, options.comments).await {
            Ok(comments) => comments,
            Err(e) => {
                warn!(video_id = video.id.as_str(), error = %e, "could not load comments");
                Vec::new()
            }
        }
    };

    video_item(video, comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn video(duration_secs: u64) -> VideoInfo {
        VideoInfo {
            id: "v1".to_string(),
            title: "Title".to_string(),
            description: "desc https://a.example.com".to_string(),
            duration_secs,
        }
    }

    #[test]
    fn test_video_item_has_description_then_comments() {
        let item = video_item(&video(300), vec!["c1".to_string(), "c2".to_string()]);
        let sources: Vec<SourceType> = item.text_blobs.iter().map(|b| b.source_type).collect();
        assert_eq!(sources, vec![SourceType::Description, SourceType::Comment, SourceType::Comment]);
        assert_eq!(item.kind, ItemKind::Video);
    }

    #[test]
    fn test_channel_item() {
        let channel = ChannelInfo {
            id: "UC1".to_string(),
            title: "Chan".to_string(),
            description: "about".to_string(),
            uploads_playlist: None,
        };
        let item = channel_item(&channel);
        assert_eq!(item.kind, ItemKind::Channel);
        assert_eq!(item.text_blobs[0].source_type, SourceType::ChannelDescription);
    }

    #[test]
    fn test_short_form_filter() {
        assert!(!is_short_form(&video(60), None));
        assert!(is_short_form(&video(60), Some(125)));
        assert!(is_short_form(&video(125), Some(125)));
        assert!(!is_short_form(&video(126), Some(125)));
    }

    #[tokio::test]
    async fn test_metadata_source_down_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", mockito::Matcher::Regex("^/videos".to_string()))
            .with_status(400)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;
        let client = YouTubeClient::with_base_url("bad", server.url()).unwrap();
        let ids = vec!["a".to_string(), "b".to_string()];

        let err = load_videos(&client, &ids, &ScanOptions::default()).await.unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 400, ref message } if message == "API key not valid"));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", mockito::Matcher::Regex("^/videos".to_string()))
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;
        let client = YouTubeClient::with_base_url("k", server.url()).unwrap();

        let videos = load_videos(&client, &["gone".to_string()], &ScanOptions::default()).await.unwrap();

        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_no_ids_loads_nothing() {
        let client = YouTubeClient::with_base_url("k", "http://127.0.0.1:9").unwrap();
        let videos = load_videos(&client, &[], &ScanOptions::default()).await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_comments_still_build_item() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", mockito::Matcher::Regex("^/commentThreads".to_string()))
            .with_status(403)
            .with_body(r#"{"error":{"message":"disabled"}}"#)
            .create_async()
            .await;
        let client = YouTubeClient::with_base_url("k", server.url()).unwrap();

        let item = build_video_item(&client, &video(300), &ScanOptions::default()).await;

        assert_eq!(item.text_blobs.len(), 1);
    }
}
