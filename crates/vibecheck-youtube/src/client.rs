//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and per-request retry on transient failures. Error bodies are mapped to
//! [`YouTubeError::Api`] so callers see the API's own message.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::YouTubeError;
use crate::retry::retry_with_backoff;
use crate::types::{CommentThreadPage, VideoListPage};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;

/// Client for the YouTube Data API v3.
///
/// Use [`YouTubeClient::new`] for production or
/// [`YouTubeClient::with_base_url`] to point at a mock server in tests.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    comment_threads_url: Url,
    videos_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YouTubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YouTubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YouTubeError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YouTubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vibecheck/0.1 (comment-analysis)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so the
        // resource joins append a path segment instead of replacing one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .map_err(|e| YouTubeError::Api(format!("invalid base URL '{base_url}': {e}")))?;
        let join = |resource: &str| {
            base.join(resource)
                .map_err(|e| YouTubeError::Api(format!("invalid base URL '{base_url}': {e}")))
        };

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            comment_threads_url: join("commentThreads")?,
            videos_url: join("videos")?,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Overrides the per-page retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches one page of top-level comment threads for a video.
    ///
    /// # Errors
    ///
    /// - [`YouTubeError::Api`] if the API returns an error envelope.
    /// - [`YouTubeError::Http`] on network failure or a non-2xx status
    ///   without an envelope.
    /// - [`YouTubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub(crate) async fn comment_threads_page(
        &self,
        video_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<CommentThreadPage, YouTubeError> {
        let page_size = page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", page_size.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let url = self.build_url(&self.comment_threads_url, &params);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
            context: format!("commentThreads(videoId={video_id})"),
            source: e,
        })
    }

    /// Fetches the snippet part of one video.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YouTubeClient::comment_threads_page`].
    pub(crate) async fn video_snippet(&self, video_id: &str) -> Result<VideoListPage, YouTubeError> {
        let url = self.build_url(&self.videos_url, &[("part", "snippet"), ("id", video_id)]);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
            context: format!("videos(id={video_id})"),
            source: e,
        })
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending the API key last.
    fn build_url(&self, endpoint: &Url, extra: &[(&str, &str)]) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in extra {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request and parses the response body as JSON.
    ///
    /// Non-2xx responses that carry the API's error envelope surface as
    /// [`YouTubeError::Api`] with the envelope message; anything else
    /// becomes [`YouTubeError::Http`]. The URL is never echoed into errors
    /// because it carries the API key.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YouTubeError> {
        let context = url.path().to_owned();
        let response = self.client.get(url.clone()).send().await?;
        let status_error = response.error_for_status_ref().err();
        let body = response.text().await?;

        if let Some(error) = status_error {
            if error.status().is_some_and(|s| s.is_client_error()) {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
                    Self::check_api_error(&value)?;
                }
            }
            return Err(error.into());
        }

        serde_json::from_str(&body).map_err(|e| YouTubeError::Deserialize {
            context,
            source: e,
        })
    }

    /// Returns the API's own message if the body is an error envelope.
    fn check_api_error(body: &serde_json::Value) -> Result<(), YouTubeError> {
        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(YouTubeError::Api(message));
        }
        Ok(())
    }
}
