//! TF-IDF feature transform loaded from a trained-vectorizer export.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;

/// Vocabulary and IDF table exported by the training job.
///
/// `transform` mirrors the trainer's featurization: lowercase alphanumeric
/// tokens, term-frequency counts over the vocabulary, IDF weighting, then
/// L2 normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Load a vectorizer export from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read,
    /// [`ModelError::Parse`] if it is not a valid export, and
    /// [`ModelError::Invalid`] if the vocabulary points outside the IDF table.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vectorizer: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        vectorizer.validate().map_err(|reason| ModelError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(vectorizer)
    }

    fn validate(&self) -> Result<(), String> {
        for (term, &index) in &self.vocabulary {
            if index >= self.idf.len() {
                return Err(format!(
                    "term '{term}' maps to index {index}, but only {} idf weights are present",
                    self.idf.len()
                ));
            }
        }
        Ok(())
    }

    /// Number of features produced per document.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Featurize one document.
    ///
    /// Out-of-vocabulary tokens are ignored; a document with no known tokens
    /// yields the zero vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0_f64; self.idf.len()];
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                features[index] += 1.0;
            }
        }
        for (index, value) in features.iter_mut().enumerate() {
            *value *= self.idf[index];
        }
        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }
        features
    }
}

/// Lowercase alphanumeric tokens, splitting on everything else.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
