use std::path::PathBuf;

/// Runtime configuration for the analyzer and its YouTube client.
#[derive(Clone)]
pub struct AppConfig {
    /// YouTube Data API key. Only required for live comment/title fetches;
    /// the comment-list path and the readiness probe work without it.
    pub youtube_api_key: Option<String>,
    /// Directory holding the exported classifier artifacts.
    pub model_dir: PathBuf,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("model_dir", &self.model_dir)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
