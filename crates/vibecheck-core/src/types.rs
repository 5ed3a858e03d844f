use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single top-level comment fetched for analysis.
///
/// Immutable once fetched. Comments have no identity beyond their position
/// in the fetched sequence; duplicates are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub like_count: u64,
    pub author: String,
    pub published_at: DateTime<Utc>,
    /// Video id the record claims to belong to. Records tagged with a
    /// different video than the one requested are dropped during collection.
    pub source_video_id: String,
}

/// The five emotion labels the pre-trained classifiers emit.
///
/// Integer codes 0–4 are the model interchange form; the lowercase name is
/// the output form. [`EmotionLabel::ALL`] fixes the ranking order used
/// whenever labels are compared or ties broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Neutral,
    Happy,
    Funny,
    Fear,
    Sad,
}

impl EmotionLabel {
    /// Number of emotion classes in the model contract.
    pub const COUNT: usize = 5;

    /// All labels in ranking order.
    pub const ALL: [EmotionLabel; EmotionLabel::COUNT] = [
        EmotionLabel::Neutral,
        EmotionLabel::Happy,
        EmotionLabel::Funny,
        EmotionLabel::Fear,
        EmotionLabel::Sad,
    ];

    /// Map a raw model code onto a label. Codes outside 0–4 have no label
    /// and must be rejected by the caller.
    #[must_use]
    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.get(code).copied()
    }

    /// The label's integer code for model interchange.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Funny => "funny",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Sad => "sad",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label percentages in `[0, 100]`.
///
/// Distributions derived from a non-empty tally sum to ≈100 up to rounding;
/// [`EmotionDistribution::FALLBACK`] is a declared prior, not a computed
/// value, and is reported whenever nothing could be classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub neutral: f64,
    pub happy: f64,
    pub funny: f64,
    pub fear: f64,
    pub sad: f64,
}

impl EmotionDistribution {
    /// Fixed prior reported when no comments could be classified.
    pub const FALLBACK: EmotionDistribution = EmotionDistribution {
        neutral: 20.0,
        happy: 30.0,
        funny: 15.0,
        fear: 15.0,
        sad: 20.0,
    };

    /// Percentage for one label.
    #[must_use]
    pub fn get(&self, label: EmotionLabel) -> f64 {
        match label {
            EmotionLabel::Neutral => self.neutral,
            EmotionLabel::Happy => self.happy,
            EmotionLabel::Funny => self.funny,
            EmotionLabel::Fear => self.fear,
            EmotionLabel::Sad => self.sad,
        }
    }

    /// `(label, percentage)` pairs in ranking order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f64)> + '_ {
        EmotionLabel::ALL.into_iter().map(|label| (label, self.get(label)))
    }

    /// Count-based percentages, rounded to two decimals.
    ///
    /// `total_valid` of zero yields the fallback prior.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_counts(counts: &[usize; EmotionLabel::COUNT], total_valid: usize) -> Self {
        if total_valid == 0 {
            return Self::FALLBACK;
        }
        let pct = |label: EmotionLabel| {
            let share = counts[usize::from(label.code())] as f64 / total_valid as f64;
            (share * 100.0 * 100.0).round() / 100.0
        };
        Self {
            neutral: pct(EmotionLabel::Neutral),
            happy: pct(EmotionLabel::Happy),
            funny: pct(EmotionLabel::Funny),
            fear: pct(EmotionLabel::Fear),
            sad: pct(EmotionLabel::Sad),
        }
    }

    /// Label with the highest percentage. Ties go to the first label in
    /// ranking order.
    #[must_use]
    pub fn dominant(&self) -> EmotionLabel {
        let mut best = EmotionLabel::Neutral;
        let mut best_pct = f64::NEG_INFINITY;
        for (label, pct) in self.iter() {
            if pct > best_pct {
                best = label;
                best_pct = pct;
            }
        }
        best
    }
}

/// Display record for one classified comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentHighlight {
    /// Comment text, truncated for display.
    pub text: String,
    pub like_count: u64,
    pub author: String,
    /// Integer code of the predicted label.
    pub prediction: u8,
}

/// Classified example comments grouped by label.
///
/// Display bookkeeping only; never feeds back into the aggregation math.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionCommentIndex {
    pub neutral: Vec<CommentHighlight>,
    pub happy: Vec<CommentHighlight>,
    pub funny: Vec<CommentHighlight>,
    pub fear: Vec<CommentHighlight>,
    pub sad: Vec<CommentHighlight>,
}

impl EmotionCommentIndex {
    pub fn push(&mut self, label: EmotionLabel, highlight: CommentHighlight) {
        match label {
            EmotionLabel::Neutral => self.neutral.push(highlight),
            EmotionLabel::Happy => self.happy.push(highlight),
            EmotionLabel::Funny => self.funny.push(highlight),
            EmotionLabel::Fear => self.fear.push(highlight),
            EmotionLabel::Sad => self.sad.push(highlight),
        }
    }

    #[must_use]
    pub fn get(&self, label: EmotionLabel) -> &[CommentHighlight] {
        match label {
            EmotionLabel::Neutral => &self.neutral,
            EmotionLabel::Happy => &self.happy,
            EmotionLabel::Funny => &self.funny,
            EmotionLabel::Fear => &self.fear,
            EmotionLabel::Sad => &self.sad,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        EmotionLabel::ALL.iter().map(|&l| self.get(l).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one analysis call.
///
/// Every failure still carries a complete, schema-valid payload with the
/// fallback distribution, so callers can render either variant uniformly
/// instead of probing for optional fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(AnalysisReport),
    Failure(AnalysisFailure),
}

impl AnalysisResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub video_id: String,
    pub video_title: String,
    pub predicted_sentiment: EmotionLabel,
    pub emotions: EmotionDistribution,
    pub dominant_emotion: EmotionLabel,
    pub emotion_comments: EmotionCommentIndex,
    /// Top comment texts echoed back for display; wider than the set that
    /// was actually classified.
    pub comments_used: Vec<String>,
    pub total_comments_analyzed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
    pub video_id: String,
    pub video_title: String,
    pub emotions: EmotionDistribution,
    pub dominant_emotion: EmotionLabel,
    pub comments_used: Vec<String>,
    pub total_comments_analyzed: usize,
}

impl AnalysisFailure {
    /// Failure payload with the fallback distribution and defaulted fields.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            video_id: String::new(),
            video_title: String::new(),
            emotions: EmotionDistribution::FALLBACK,
            dominant_emotion: EmotionLabel::Neutral,
            comments_used: Vec::new(),
            total_comments_analyzed: 0,
        }
    }

    #[must_use]
    pub fn with_video(mut self, video_id: impl Into<String>, video_title: impl Into<String>) -> Self {
        self.video_id = video_id.into();
        self.video_title = video_title.into();
        self
    }
}
