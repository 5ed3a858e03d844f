//! Two-stage classification: per-comment labels, then tally aggregation.

use vibecheck_core::{
    Comment, CommentHighlight, EmotionCommentIndex, EmotionDistribution, EmotionLabel,
};
use vibecheck_models::ArtifactStore;

use crate::error::PipelineError;

/// Upper bound on classified comments per video.
///
/// The aggregator was trained on tallies drawn from samples of at most this
/// size, so the bound is a contract with the artifact, not a tuning knob.
pub const CLASSIFIED_COMMENT_CAP: usize = 30;

/// Display truncation length for indexed comment texts.
const HIGHLIGHT_TEXT_LEN: usize = 100;

/// Video-level prediction with its supporting breakdown.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// The aggregator's verdict for the whole video.
    pub sentiment: EmotionLabel,
    /// Count-based percentages over the classified comments.
    pub emotions: EmotionDistribution,
    /// Example comments per label, for display.
    pub comment_index: EmotionCommentIndex,
}

impl Prediction {
    /// Neutral fallback used for empty input and model failures.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            sentiment: EmotionLabel::Neutral,
            emotions: EmotionDistribution::FALLBACK,
            comment_index: EmotionCommentIndex::default(),
        }
    }
}

/// Classify a comment set and aggregate it into one video-level sentiment.
///
/// Comments are ranked by like count (stable on ties) and at most
/// [`CLASSIFIED_COMMENT_CAP`] of them classified. Model failures fold into
/// the neutral fallback with a logged error; they never surface as errors,
/// and never as a partial tally.
#[must_use]
pub fn predict(artifacts: &ArtifactStore, comments: &[Comment]) -> Prediction {
    match try_predict(artifacts, comments) {
        Ok(prediction) => prediction,
        Err(error) => {
            tracing::error!(error = %error, "sentiment pipeline failed; falling back to neutral");
            Prediction::fallback()
        }
    }
}

fn try_predict(
    artifacts: &ArtifactStore,
    comments: &[Comment],
) -> Result<Prediction, PipelineError> {
    if comments.is_empty() {
        tracing::info!("no comments to classify; reporting the fallback distribution");
        return Ok(Prediction::fallback());
    }

    let ranked = rank_by_likes(comments);

    let mut counts = [0_usize; EmotionLabel::COUNT];
    let mut index = EmotionCommentIndex::default();
    let mut total_valid = 0_usize;
    let mut rejected = 0_usize;

    for comment in ranked.into_iter().take(CLASSIFIED_COMMENT_CAP) {
        let code = artifacts.classify_text(&comment.text)?;
        let Some(label) = EmotionLabel::from_code(code) else {
            rejected += 1;
            tracing::warn!(code, "classifier emitted an unmapped label code; dropping comment");
            continue;
        };
        counts[usize::from(label.code())] += 1;
        total_valid += 1;
        index.push(
            label,
            CommentHighlight {
                text: truncate_for_display(&comment.text),
                like_count: comment.like_count,
                author: comment.author.clone(),
                prediction: label.code(),
            },
        );
    }

    if rejected > 0 {
        tracing::warn!(rejected, "comments dropped for unmapped label codes");
    }

    if total_valid == 0 {
        tracing::warn!("no comment survived classification; reporting the fallback distribution");
        return Ok(Prediction::fallback());
    }

    let aggregated = artifacts.aggregate(&counts)?;
    let sentiment = EmotionLabel::from_code(aggregated)
        .ok_or(PipelineError::UnmappedSentiment(aggregated))?;

    // The aggregator decides the headline sentiment; the distribution stays
    // count-based regardless of what it says.
    let emotions = EmotionDistribution::from_counts(&counts, total_valid);

    tracing::info!(
        classified = total_valid,
        sentiment = %sentiment,
        "sentiment pipeline complete"
    );

    Ok(Prediction {
        sentiment,
        emotions,
        comment_index: index,
    })
}

/// Likes-descending order; ties keep their fetched position.
pub(crate) fn rank_by_likes(comments: &[Comment]) -> Vec<&Comment> {
    let mut ranked: Vec<&Comment> = comments.iter().collect();
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    ranked
}

fn truncate_for_display(text: &str) -> String {
    if text.chars().count() <= HIGHLIGHT_TEXT_LEN {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(HIGHLIGHT_TEXT_LEN).collect();
    truncated.push_str("...");
    truncated
}
