// src/youtube/client.rs
// =============================================================================
// A thin read-only client for the YouTube Data API v3.
//
// Only the calls the audit needs:
// - channels        (title, description, uploads playlist)
// - playlistItems   (paging through the uploads playlist)
// - videos          (title, description, duration; also used for liveness)
// - commentThreads  (top comments by relevance)
// - playlists       (liveness of end screen playlists)
//
// Every call authenticates with an API key passed as the `key` parameter.
// =============================================================================

use super::duration::parse_duration;
use crate::endcard::ReferenceKind;
use crate::error::{ApiError, ApiResult};
use crate::traits::{LivenessLookup, MAX_LOOKUP_BATCH};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

// Guards against a misbehaving API handing back the same page forever
// (50 videos per page, so this is 25k uploads)
const MAX_PAGES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub uploads_playlist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_secs: u64,
}

// --- Wire types (only the fields we read) ---

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snippet {
    title: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelResource {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct IdResource {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadResource {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> ApiResult<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(YouTubeClient {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    // Sends a GET to `{base}/{resource}` and decodes the JSON body
    //
    // Non-2xx responses become ApiError::Api with the message from the
    // API's error envelope when there is one.
    async fn get_json<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> ApiResult<T> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(resource, "data api request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ApiError::Api { status: status.as_u16(), message });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn channel(&self, channel_id: &str) -> ApiResult<ChannelInfo> {
        let response: ListResponse<ChannelResource> = self
            .get_json("channels", &[("part", "snippet,contentDetails"), ("id", channel_id)])
            .await?;

        let channel = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("channel {}", channel_id)))?;

        Ok(ChannelInfo {
            id: channel.id,
            title: channel.snippet.title,
            description: channel.snippet.description,
            uploads_playlist: channel
                .content_details
                .and_then(|d| d.related_playlists)
                .and_then(|p| p.uploads),
        })
    }

    /// All video ids of a playlist, following nextPageToken
    pub async fn playlist_video_ids(&self, playlist_id: &str) -> ApiResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut params = vec![
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", "50"),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response: ListResponse<PlaylistItemResource> =
                self.get_json("playlistItems", &params).await?;
            ids.extend(response.items.into_iter().map(|i| i.content_details.video_id));

            match response.next_page_token {
                Some(next) if page_token.as_deref() != Some(next.as_str()) => page_token = Some(next),
                _ => break,
            }
        }

        Ok(ids)
    }

    /// Metadata for up to 50 videos. Unknown ids are simply absent.
    pub async fn videos(&self, ids: &[String]) -> ApiResult<Vec<VideoInfo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let response: ListResponse<VideoResource> = self
            .get_json("videos", &[("part", "snippet,contentDetails"), ("id", joined.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|v| VideoInfo {
                id: v.id,
                title: v.snippet.title,
                description: v.snippet.description,
                duration_secs: v.content_details.map(|d| parse_duration(&d.duration)).unwrap_or(0),
            })
            .collect())
    }

    /// Plain-text bodies of the top `max` comments, most relevant first
    pub async fn top_comments(&self, video_id: &str, max: u32) -> ApiResult<Vec<String>> {
        let max = max.clamp(1, 100).to_string();
        let response: ListResponse<CommentThreadResource> = self
            .get_json(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", max.as_str()),
                    ("order", "relevance"),
                    ("textFormat", "plainText"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|t| t.snippet.top_level_comment.snippet.text_display)
            .collect())
    }
}

#[async_trait]
impl LivenessLookup for YouTubeClient {
    async fn existing(&self, kind: ReferenceKind, ids: &[String]) -> ApiResult<HashSet<String>> {
        let resource = match kind {
            ReferenceKind::Video => "videos",
            ReferenceKind::Playlist => "playlists",
        };

        let mut found = HashSet::new();
        for batch in ids.chunks(MAX_LOOKUP_BATCH) {
            let joined = batch.join(",");
            let response: ListResponse<IdResource> = self
                .get_json(resource, &[("part", "id"), ("id", joined.as_str())])
                .await?;
            found.extend(response.items.into_iter().map(|i| i.id));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> YouTubeClient {
        YouTubeClient::with_base_url("test-key", server.url()).unwrap()
    }

    #[tokio::test]
    async fn test_channel_lookup() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/channels".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".to_string(), "UC123".to_string()),
                Matcher::UrlEncoded("key".to_string(), "test-key".to_string()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"items":[{"id":"UC123","snippet":{"title":"My Channel","description":"Shop: https://shop.example.com"},
                    "contentDetails":{"relatedPlaylists":{"uploads":"UU123"}}}]}"#,
            )
            .create_async()
            .await;

        let channel = client(&server).channel("UC123").await.unwrap();

        assert_eq!(channel.title, "My Channel");
        assert_eq!(channel.uploads_playlist.as_deref(), Some("UU123"));
        assert!(channel.description.contains("shop.example.com"));
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/channels".to_string()))
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let err = client(&server).channel("UCnope").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/commentThreads".to_string()))
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"The video has disabled comments."}}"#)
            .create_async()
            .await;

        let err = client(&server).top_comments("vid", 10).await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "The video has disabled comments.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_playlist_pages_are_followed() {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("GET", Matcher::Regex("^/playlistItems".to_string()))
            .with_status(200)
            .with_body(
                r#"{"items":[{"contentDetails":{"videoId":"a"}},{"contentDetails":{"videoId":"b"}}],"nextPageToken":"p2"}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let _second = server
            .mock("GET", Matcher::Regex("^/playlistItems".to_string()))
            .match_query(Matcher::UrlEncoded("pageToken".to_string(), "p2".to_string()))
            .with_status(200)
            .with_body(r#"{"items":[{"contentDetails":{"videoId":"c"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let ids = client(&server).playlist_video_ids("UU123").await.unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_videos_and_comments_decode() {
        let mut server = mockito::Server::new_async().await;
        let _videos = server
            .mock("GET", Matcher::Regex("^/videos".to_string()))
            .with_status(200)
            .with_body(
                r#"{"items":[{"id":"v1","snippet":{"title":"Intro","description":"https://a.example.com"},
                    "contentDetails":{"duration":"PT3M10S"}}]}"#,
            )
            .create_async()
            .await;
        let _comments = server
            .mock("GET", Matcher::Regex("^/commentThreads".to_string()))
            .match_query(Matcher::UrlEncoded("maxResults".to_string(), "5".to_string()))
            .with_status(200)
            .with_body(
                r#"{"items":[{"snippet":{"topLevelComment":{"snippet":{"textDisplay":"great, see https://b.example.com"}}}}]}"#,
            )
            .create_async()
            .await;

        let c = client(&server);
        let videos = c.videos(&["v1".to_string(), "gone".to_string()]).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].duration_secs, 190);

        let comments = c.top_comments("v1", 5).await.unwrap();
        assert_eq!(comments, vec!["great, see https://b.example.com"]);
    }

    #[tokio::test]
    async fn test_liveness_lookup_returns_existing_ids() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/playlists".to_string()))
            .match_query(Matcher::UrlEncoded("id".to_string(), "PL1,PL2".to_string()))
            .with_status(200)
            .with_body(r#"{"items":[{"id":"PL2"}]}"#)
            .create_async()
            .await;

        let existing = client(&server)
            .existing(ReferenceKind::Playlist, &["PL1".to_string(), "PL2".to_string()])
            .await
            .unwrap();

        assert_eq!(existing, HashSet::from(["PL2".to_string()]));
    }
}
