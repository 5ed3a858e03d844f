use thiserror::Error;
use vibecheck_models::ModelError;

/// Internal pipeline failures. These fold into the neutral fallback output
/// at the pipeline boundary; they never reach the public result types.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The aggregator answered with a code no emotion label maps to.
    #[error("aggregator emitted unmapped sentiment code {0}")]
    UnmappedSentiment(usize),
}
