use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vibecheck_analyzer::Analyzer;
use vibecheck_core::AppConfig;
use vibecheck_models::ArtifactStore;
use vibecheck_youtube::YouTubeClient;

#[derive(Debug, Parser)]
#[command(name = "vibecheck")]
#[command(about = "YouTube comment emotion analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze the comments of one video by URL.
    Analyze { url: String },
    /// Run a newline-separated file of comment texts through the pipeline.
    Comments {
        file: PathBuf,
        /// Title to attach to the result.
        #[arg(long, default_value = "Provided comments")]
        title: String,
    },
    /// Report whether all three classifier artifacts are loaded.
    Ready,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = vibecheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let artifacts = Arc::new(ArtifactStore::load(&config.model_dir));

    match cli.command {
        Commands::Analyze { url } => {
            let key = config
                .youtube_api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("YOUTUBE_API_KEY is not set"))?;
            let analyzer = Analyzer::new(build_client(key, &config)?, artifacts);
            let result = analyzer.analyze(&url).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Comments { file, title } => {
            let texts: Vec<String> = std::fs::read_to_string(&file)?
                .lines()
                .map(str::to_owned)
                .collect();
            // The comment-list path never calls the API; an unset key is fine.
            let key = config.youtube_api_key.as_deref().unwrap_or_default();
            let analyzer = Analyzer::new(build_client(key, &config)?, artifacts);
            let result = analyzer.analyze_list(&texts, &title);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Ready => {
            if artifacts.is_ready() {
                println!("ready");
            } else {
                println!("not ready");
                tracing::warn!(
                    vectorizer = artifacts.has_vectorizer(),
                    comment_model = artifacts.has_comment_model(),
                    aggregator = artifacts.has_aggregator(),
                    "one or more artifacts missing"
                );
            }
        }
    }

    Ok(())
}

fn build_client(api_key: &str, config: &AppConfig) -> anyhow::Result<YouTubeClient> {
    Ok(
        YouTubeClient::new(api_key, config.http_timeout_secs)?
            .with_retry_policy(config.max_retries, config.retry_backoff_base_ms),
    )
}
