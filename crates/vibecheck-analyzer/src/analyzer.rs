//! Orchestrates one analysis: URL → id → {title, comments} → pipeline →
//! assembled result.

use std::sync::Arc;

use chrono::Utc;
use vibecheck_core::{AnalysisFailure, AnalysisReport, AnalysisResult, Comment};
use vibecheck_models::ArtifactStore;
use vibecheck_youtube::YouTubeClient;

use crate::pipeline::{self, rank_by_likes, CLASSIFIED_COMMENT_CAP};

/// Comments requested per page from the comment source.
const COMMENT_PAGE_SIZE: u32 = 100;

/// How many top comments are echoed back for display.
const DISPLAY_COMMENT_COUNT: usize = 20;

/// Video id attached to synthetic comment-list analyses.
const SYNTHETIC_VIDEO_ID: &str = "provided_comments";

/// Analysis service holding the two adapters and the shared artifacts.
///
/// Explicitly constructed and passed around; the artifact store is
/// read-only after load, so concurrent analyses can share one `Analyzer`
/// behind an `Arc` without locking.
pub struct Analyzer {
    youtube: YouTubeClient,
    artifacts: Arc<ArtifactStore>,
}

impl Analyzer {
    #[must_use]
    pub fn new(youtube: YouTubeClient, artifacts: Arc<ArtifactStore>) -> Self {
        Self { youtube, artifacts }
    }

    /// `true` once all three classifier artifacts are available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.artifacts.is_ready()
    }

    /// Analyze the comments of the video behind `video_url`.
    ///
    /// Always returns a complete result: failures come back as the
    /// [`AnalysisResult::Failure`] variant carrying the fallback
    /// distribution, never as an error or a partial payload.
    pub async fn analyze(&self, video_url: &str) -> AnalysisResult {
        let Some(video_id) = parse_video_id(video_url) else {
            tracing::warn!(url = video_url, "unrecognized video URL form");
            return AnalysisResult::Failure(AnalysisFailure::new("Invalid YouTube URL format"));
        };
        tracing::info!(video = %video_id, "starting analysis");

        let video_title = self.youtube.video_title(&video_id).await;

        let comments = match self.youtube.fetch_comments(&video_id, COMMENT_PAGE_SIZE).await {
            Ok(comments) if !comments.is_empty() => comments,
            Ok(_) => {
                tracing::warn!(video = %video_id, "no comments available");
                return empty_comments_failure(&video_id, video_title);
            }
            Err(error) => {
                tracing::warn!(video = %video_id, error = %error, "comment fetch failed");
                return empty_comments_failure(&video_id, video_title);
            }
        };

        let prediction = pipeline::predict(&self.artifacts, &comments);
        let dominant_emotion = prediction.emotions.dominant();
        let comments_used = top_comment_texts(&comments);

        AnalysisResult::Success(AnalysisReport {
            video_id,
            video_title,
            predicted_sentiment: prediction.sentiment,
            emotions: prediction.emotions,
            dominant_emotion,
            emotion_comments: prediction.comment_index,
            comments_used,
            // Reported as the selection cap rather than the post-filter
            // count; downstream consumers key on the literal 30.
            total_comments_analyzed: CLASSIFIED_COMMENT_CAP,
        })
    }

    /// Analyze raw comment texts without touching the comment source.
    ///
    /// Exercises the pipeline directly. Synthetic records get one like
    /// apiece, so the ranking keeps the caller's order and "top 30" means
    /// the first 30 usable texts.
    #[must_use]
    pub fn analyze_list(&self, comment_texts: &[String], video_title: &str) -> AnalysisResult {
        if !self.artifacts.is_ready() {
            tracing::warn!("comment-list analysis requested with artifacts missing");
            return AnalysisResult::Failure(AnalysisFailure::new("Models not loaded properly"));
        }

        let comments: Vec<Comment> = comment_texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(position, text)| Comment {
                text: text.clone(),
                like_count: 1,
                author: format!("TestUser{position}"),
                published_at: Utc::now(),
                source_video_id: SYNTHETIC_VIDEO_ID.to_owned(),
            })
            .collect();

        if comments.is_empty() {
            return AnalysisResult::Failure(AnalysisFailure::new("No comments provided"));
        }

        let prediction = pipeline::predict(&self.artifacts, &comments);
        let dominant_emotion = prediction.emotions.dominant();
        let comments_used = top_comment_texts(&comments);
        let total = comments.len();

        AnalysisResult::Success(AnalysisReport {
            video_id: SYNTHETIC_VIDEO_ID.to_owned(),
            video_title: video_title.to_owned(),
            predicted_sentiment: prediction.sentiment,
            emotions: prediction.emotions,
            dominant_emotion,
            emotion_comments: prediction.comment_index,
            comments_used,
            total_comments_analyzed: total,
        })
    }
}

fn empty_comments_failure(video_id: &str, video_title: String) -> AnalysisResult {
    AnalysisResult::Failure(
        AnalysisFailure::new(format!("Failed to fetch comments for video {video_id}"))
            .with_video(video_id, video_title),
    )
}

/// Top comment texts by like count from the full fetched set — display
/// only, wider than the classified window.
fn top_comment_texts(comments: &[Comment]) -> Vec<String> {
    rank_by_likes(comments)
        .into_iter()
        .take(DISPLAY_COMMENT_COUNT)
        .map(|comment| comment.text.clone())
        .collect()
}

/// Extract the video id from a watch URL.
///
/// Recognized forms: `...?v=<id>[&...]` and `...youtu.be/<id>[?...]`.
fn parse_video_id(url: &str) -> Option<String> {
    if let Some((_, rest)) = url.split_once("v=") {
        return first_segment(rest, '&');
    }
    if let Some((_, rest)) = url.split_once("youtu.be/") {
        return first_segment(rest, '?');
    }
    None
}

fn first_segment(rest: &str, stop: char) -> Option<String> {
    let id = rest.split(stop).next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_urls() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_owned())
        );
    }

    #[test]
    fn parses_watch_urls_with_extra_params() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=abc123&t=42s&list=PL"),
            Some("abc123".to_owned())
        );
    }

    #[test]
    fn parses_short_urls() {
        assert_eq!(
            parse_video_id("https://youtu.be/abc123"),
            Some("abc123".to_owned())
        );
    }

    #[test]
    fn parses_short_urls_with_query() {
        assert_eq!(
            parse_video_id("https://youtu.be/abc123?t=10"),
            Some("abc123".to_owned())
        );
    }

    #[test]
    fn rejects_unrecognized_urls() {
        assert_eq!(parse_video_id("not-a-youtube-link"), None);
        assert_eq!(parse_video_id("https://example.com/watch"), None);
    }

    #[test]
    fn rejects_empty_ids() {
        assert_eq!(parse_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(parse_video_id("https://youtu.be/"), None);
    }
}
