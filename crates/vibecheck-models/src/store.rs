//! Loads and serves the three pre-trained classifier artifacts.

use std::path::Path;

use crate::ensemble::TreeEnsemble;
use crate::error::ModelError;
use crate::tfidf::TfidfVectorizer;

/// File names the training job exports into the model directory.
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const COMMENT_MODEL_FILE: &str = "comment_classifier.json";
pub const AGGREGATOR_FILE: &str = "sentiment_aggregator.json";

/// The three pre-trained artifacts, loaded once and read-only afterwards.
///
/// Each artifact is independently optional: a missing or malformed file is
/// logged and recorded as absent rather than failing startup. Calls that
/// need an absent artifact return [`ModelError::Unavailable`]. There is no
/// mutation API; a reload means constructing a new store.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    vectorizer: Option<TfidfVectorizer>,
    comment_model: Option<TreeEnsemble>,
    aggregator: Option<TreeEnsemble>,
}

impl ArtifactStore {
    /// Load whichever artifacts are present under `model_dir`.
    #[must_use]
    pub fn load(model_dir: &Path) -> Self {
        let vectorizer = load_optional(
            &model_dir.join(VECTORIZER_FILE),
            "tfidf_vectorizer",
            TfidfVectorizer::load,
        );
        let comment_model = load_optional(
            &model_dir.join(COMMENT_MODEL_FILE),
            "comment_classifier",
            TreeEnsemble::load,
        );
        let aggregator = load_optional(
            &model_dir.join(AGGREGATOR_FILE),
            "sentiment_aggregator",
            TreeEnsemble::load,
        );

        if let Some(model) = &comment_model {
            tracing::info!(
                classes = model.n_classes(),
                features = model.n_features(),
                "comment classifier ready"
            );
        }
        if let Some(model) = &aggregator {
            tracing::info!(
                classes = model.n_classes(),
                features = model.n_features(),
                "sentiment aggregator ready"
            );
        }

        Self {
            vectorizer,
            comment_model,
            aggregator,
        }
    }

    /// `true` once all three artifacts are available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.has_vectorizer() && self.has_comment_model() && self.has_aggregator()
    }

    #[must_use]
    pub fn has_vectorizer(&self) -> bool {
        self.vectorizer.is_some()
    }

    #[must_use]
    pub fn has_comment_model(&self) -> bool {
        self.comment_model.is_some()
    }

    #[must_use]
    pub fn has_aggregator(&self) -> bool {
        self.aggregator.is_some()
    }

    /// Classify one comment text, returning the raw model code.
    ///
    /// The code is whatever class the comment classifier emits; mapping it
    /// onto an emotion label — and rejecting codes with no label — is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Unavailable`] if the vectorizer or the comment
    /// classifier is missing, and [`ModelError::FeatureShape`] if the two
    /// artifacts disagree on feature width.
    pub fn classify_text(&self, text: &str) -> Result<usize, ModelError> {
        let vectorizer = self
            .vectorizer
            .as_ref()
            .ok_or(ModelError::Unavailable("tfidf_vectorizer"))?;
        let model = self
            .comment_model
            .as_ref()
            .ok_or(ModelError::Unavailable("comment_classifier"))?;
        let features = vectorizer.transform(text);
        model.predict(&features)
    }

    /// Aggregate a per-label tally into the video-level sentiment code.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Unavailable`] if the aggregator is missing and
    /// [`ModelError::FeatureShape`] if the tally width does not match the
    /// aggregator's input.
    pub fn aggregate(&self, counts: &[usize]) -> Result<usize, ModelError> {
        let model = self
            .aggregator
            .as_ref()
            .ok_or(ModelError::Unavailable("sentiment_aggregator"))?;
        #[allow(clippy::cast_precision_loss)]
        let features: Vec<f64> = counts.iter().map(|&count| count as f64).collect();
        model.predict(&features)
    }
}

fn load_optional<T>(
    path: &Path,
    name: &'static str,
    load: impl FnOnce(&Path) -> Result<T, ModelError>,
) -> Option<T> {
    if !path.exists() {
        tracing::warn!(
            artifact = name,
            path = %path.display(),
            "artifact file not found; calls that need it will be rejected"
        );
        return None;
    }
    match load(path) {
        Ok(artifact) => {
            tracing::info!(artifact = name, path = %path.display(), "artifact loaded");
            Some(artifact)
        }
        Err(error) => {
            tracing::warn!(artifact = name, error = %error, "artifact failed to load");
            None
        }
    }
}
