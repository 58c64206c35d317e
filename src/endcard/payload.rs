// src/endcard/payload.rs
// =============================================================================
// Finds end screen references inside a watch page.
//
// The page embeds its player state as a JavaScript assignment:
//
//   var ytInitialPlayerResponse = {...};var meta = ...
//
// We locate the marker, parse the first JSON value after the '=' (whatever
// script follows it is ignored), and walk
// endscreen.endScreenRenderer.elements.
//
// Only two element shapes are recognised: a video renderer with a videoId
// and a playlist renderer with a playlistId. Everything else is skipped.
// =============================================================================

use super::{EndCardRef, ReferenceKind};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const PAYLOAD_MARKER: &str = "ytInitialPlayerResponse";

/// Result of scanning one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndCardData {
    /// No marker, unparseable payload, or no end screen at all.
    /// A normal terminal state, not an error.
    NoEndCardData,
    /// Explicit references, in page order (algorithmic elements are dropped)
    References(Vec<EndCardRef>),
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    endscreen: Option<Endscreen>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Endscreen {
    end_screen_renderer: Option<EndScreenRenderer>,
}

#[derive(Debug, Deserialize)]
struct EndScreenRenderer {
    #[serde(default)]
    elements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementShape {
    end_screen_video_renderer: Option<VideoRenderer>,
    end_screen_playlist_renderer: Option<PlaylistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRenderer {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistRenderer {
    playlist_id: Option<String>,
}

pub fn parse_end_cards(page: &str) -> EndCardData {
    let Some(renderer) = find_renderer(page) else {
        return EndCardData::NoEndCardData;
    };

    let references = renderer
        .elements
        .into_iter()
        .filter_map(parse_element)
        .collect();

    EndCardData::References(references)
}

// Tries every occurrence of the marker; pages sometimes mention the name in
// other scripts before the real assignment.
fn find_renderer(page: &str) -> Option<EndScreenRenderer> {
    for (index, _) in page.match_indices(PAYLOAD_MARKER) {
        let Some(json) = assignment_value(&page[index + PAYLOAD_MARKER.len()..]) else {
            continue;
        };

        let mut values = serde_json::Deserializer::from_str(json).into_iter::<PlayerResponse>();
        match values.next() {
            Some(Ok(response)) => {
                return response.endscreen.and_then(|e| e.end_screen_renderer);
            }
            Some(Err(e)) => debug!(error = %e, "player payload did not parse"),
            None => {}
        }
    }
    None
}

// `  = {...` -> `{...`
fn assignment_value(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    rest.starts_with('{').then_some(rest)
}

fn parse_element(element: Value) -> Option<EndCardRef> {
    let shape: ElementShape = match serde_json::from_value(element) {
        Ok(shape) => shape,
        Err(e) => {
            debug!(error = %e, "skipping malformed end screen element");
            return None;
        }
    };

    // A video renderer without a videoId is an algorithmic "best for viewer"
    // slot: nothing to audit.
    if let Some(video) = shape.end_screen_video_renderer {
        return video
            .video_id
            .filter(|id| !id.is_empty())
            .map(|id| EndCardRef { kind: ReferenceKind::Video, target_id: id });
    }

    shape
        .end_screen_playlist_renderer
        .and_then(|p| p.playlist_id)
        .filter(|id| !id.is_empty())
        .map(|id| EndCardRef { kind: ReferenceKind::Playlist, target_id: id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(payload: &str) -> String {
        format!(
            "<html><script>var ytInitialPlayerResponse = {};var meta = {{\"a\":1}};</script></html>",
            payload
        )
    }

    #[test]
    fn test_parses_both_reference_shapes() {
        let page = page_with(
            r#"{"videoDetails":{"videoId":"self"},"endscreen":{"endScreenRenderer":{"elements":[
                {"endScreenVideoRenderer":{"videoId":"vid123","title":{"simpleText":"Next"}}},
                {"endScreenPlaylistRenderer":{"playlistId":"PL123"}}
            ]}}}"#,
        );

        assert_eq!(
            parse_end_cards(&page),
            EndCardData::References(vec![
                EndCardRef { kind: ReferenceKind::Video, target_id: "vid123".to_string() },
                EndCardRef { kind: ReferenceKind::Playlist, target_id: "PL123".to_string() },
            ])
        );
    }

    #[test]
    fn test_algorithmic_and_unknown_elements_are_skipped() {
        let page = page_with(
            r#"{"endscreen":{"endScreenRenderer":{"elements":[
                {"endScreenVideoRenderer":{"title":"best for viewer"}},
                {"endScreenChannelRenderer":{"channelId":"UC1"}},
                {"endScreenVideoRenderer":"not an object"},
                42,
                {"endScreenPlaylistRenderer":{"playlistId":"PLok"}}
            ]}}}"#,
        );

        assert_eq!(
            parse_end_cards(&page),
            EndCardData::References(vec![EndCardRef {
                kind: ReferenceKind::Playlist,
                target_id: "PLok".to_string(),
            }])
        );
    }

    #[test]
    fn test_missing_marker_means_no_data() {
        assert_eq!(parse_end_cards("<html>nothing here</html>"), EndCardData::NoEndCardData);
    }

    #[test]
    fn test_broken_payload_means_no_data() {
        let page = "var ytInitialPlayerResponse = {\"endscreen\": {oops};";
        assert_eq!(parse_end_cards(page), EndCardData::NoEndCardData);
    }

    #[test]
    fn test_payload_without_endscreen_means_no_data() {
        let page = page_with(r#"{"videoDetails":{"videoId":"abc"}}"#);
        assert_eq!(parse_end_cards(&page), EndCardData::NoEndCardData);
    }

    #[test]
    fn test_earlier_non_assignment_mentions_are_ignored() {
        let page = format!(
            "<script>if (window.ytInitialPlayerResponse) {{}}</script>{}",
            page_with(r#"{"endscreen":{"endScreenRenderer":{"elements":[{"endScreenVideoRenderer":{"videoId":"v1"}}]}}}"#)
        );
        assert_eq!(
            parse_end_cards(&page),
            EndCardData::References(vec![EndCardRef {
                kind: ReferenceKind::Video,
                target_id: "v1".to_string(),
            }])
        );
    }
}
