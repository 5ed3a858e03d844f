//! Pre-trained classifier artifacts: the TF-IDF feature transform, the
//! per-comment emotion classifier, and the tally aggregator.
//!
//! Artifacts are JSON exports produced by the offline training job. They are
//! loaded once at startup and never mutated; a reload means building a new
//! [`ArtifactStore`].

pub mod ensemble;
pub mod error;
pub mod store;
pub mod tfidf;

pub use ensemble::{DecisionTree, EnsembleKind, TreeEnsemble};
pub use error::ModelError;
pub use store::{ArtifactStore, AGGREGATOR_FILE, COMMENT_MODEL_FILE, VECTORIZER_FILE};
pub use tfidf::TfidfVectorizer;
