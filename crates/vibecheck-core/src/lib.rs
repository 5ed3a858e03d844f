//! Shared domain types and configuration for the vibecheck workspace.

pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use types::{
    AnalysisFailure, AnalysisReport, AnalysisResult, Comment, CommentHighlight,
    EmotionCommentIndex, EmotionDistribution, EmotionLabel,
};
