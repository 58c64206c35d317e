// src/youtube/page.rs
// Fetches the public watch page of a video; the end screen payload is
// embedded in it (see endcard/payload.rs).

use crate::error::{ApiError, ApiResult};
use crate::traits::PageFetcher;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com";

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

#[derive(Debug, Clone)]
pub struct WatchPageFetcher {
    http: Client,
    base_url: String,
}

impl WatchPageFetcher {
    pub fn new() -> ApiResult<Self> {
        Self::with_base_url(DEFAULT_WATCH_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(WatchPageFetcher {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for WatchPageFetcher {
    async fn fetch_page(&self, item_id: &str) -> ApiResult<String> {
        let response = self
            .http
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", item_id)])
            .header(USER_AGENT, PAGE_USER_AGENT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: format!("watch page for {} unavailable", item_id),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_fetches_watch_page_by_id() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/watch".to_string()))
            .match_query(Matcher::UrlEncoded("v".to_string(), "abc123".to_string()))
            .with_status(200)
            .with_body("<html>var ytInitialPlayerResponse = {};</html>")
            .create_async()
            .await;

        let fetcher = WatchPageFetcher::with_base_url(server.url()).unwrap();
        let page = fetcher.fetch_page("abc123").await.unwrap();
        assert!(page.contains("ytInitialPlayerResponse"));
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/watch".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let fetcher = WatchPageFetcher::with_base_url(server.url()).unwrap();
        let err = fetcher.fetch_page("abc123").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 500, .. }));
    }
}
