//! Comment collection: pagination with a hard cap, per-record identity
//! verification, and an all-or-nothing error policy.

use chrono::{DateTime, Utc};
use vibecheck_core::Comment;

use crate::client::YouTubeClient;
use crate::error::YouTubeError;
use crate::types::CommentThread;

/// Hard cap on pagination depth, regardless of continuation tokens.
pub const MAX_COMMENT_PAGES: usize = 10;

impl YouTubeClient {
    /// Fetches up to [`MAX_COMMENT_PAGES`] pages of top-level comments.
    ///
    /// A failure on any page discards everything collected so far for this
    /// call: a partial sample would otherwise be analyzed as if it were the
    /// full one. Records that come back tagged with a different video id
    /// are dropped and the discrepancy count logged.
    ///
    /// # Errors
    ///
    /// Returns the first page-level [`YouTubeError`], with no comments.
    pub async fn fetch_comments(
        &self,
        video_id: &str,
        page_size: u32,
    ) -> Result<Vec<Comment>, YouTubeError> {
        let mut comments: Vec<Comment> = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_COMMENT_PAGES {
            let result = self
                .comment_threads_page(video_id, page_size, page_token.as_deref())
                .await;
            let page_data = match result {
                Ok(page_data) => page_data,
                Err(error) => {
                    tracing::warn!(
                        video = video_id,
                        page,
                        collected = comments.len(),
                        error = %error,
                        "comment page fetch failed; discarding partial results"
                    );
                    return Err(error);
                }
            };

            let fetched = page_data.items.len();
            comments.extend(
                page_data
                    .items
                    .into_iter()
                    .map(|thread| to_comment(thread, video_id)),
            );
            tracing::debug!(
                video = video_id,
                page,
                fetched,
                total = comments.len(),
                "comment page fetched"
            );

            page_token = page_data.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        let before = comments.len();
        comments.retain(|comment| comment.source_video_id == video_id);
        let dropped = before - comments.len();
        if dropped > 0 {
            tracing::warn!(
                video = video_id,
                dropped,
                "dropped comments tagged with a different video id"
            );
        }

        tracing::info!(
            video = video_id,
            count = comments.len(),
            "comment collection complete"
        );
        Ok(comments)
    }
}

fn to_comment(thread: CommentThread, requested_video_id: &str) -> Comment {
    let source_video_id = thread
        .snippet
        .video_id
        .unwrap_or_else(|| requested_video_id.to_owned());
    let snippet = thread.snippet.top_level_comment.snippet;
    Comment {
        text: snippet.text_display,
        like_count: snippet.like_count,
        author: snippet.author_display_name,
        published_at: snippet.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
        source_video_id,
    }
}
