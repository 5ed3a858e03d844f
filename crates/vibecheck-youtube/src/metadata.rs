//! Video title lookup that degrades to placeholders instead of failing.

use crate::client::YouTubeClient;

/// Longest slice of an upstream error message echoed into a placeholder.
const ERROR_SNIPPET_LEN: usize = 50;

impl YouTubeClient {
    /// Human-readable title for a video id.
    ///
    /// Lookup failures never propagate: a missing title is not a reason to
    /// abort an analysis, so "not found" and transport errors both come
    /// back as descriptive placeholder strings.
    pub async fn video_title(&self, video_id: &str) -> String {
        match self.video_snippet(video_id).await {
            Ok(page) => match page.items.into_iter().next() {
                Some(item) => {
                    tracing::debug!(video = video_id, title = %item.snippet.title, "video title retrieved");
                    item.snippet.title
                }
                None => {
                    tracing::warn!(video = video_id, "no video found for id");
                    format!("Video Not Found (ID: {video_id})")
                }
            },
            Err(error) => {
                tracing::warn!(video = video_id, error = %error, "title lookup failed");
                let message = error.to_string();
                let snippet: String = message.chars().take(ERROR_SNIPPET_LEN).collect();
                format!("Title Unavailable ({snippet})")
            }
        }
    }
}
