use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{InsightsError, Result};
use crate::retry::RetryPolicy;

/// Main configuration structure for Review Insights
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Hosted inference API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Retry and backoff configuration for remote calls
    #[serde(default)]
    pub retry: RetryConfig,
    /// Summarization request configuration
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    /// Pipeline execution configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from the first default
    /// location that exists, or fall back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let default_paths = [
            dirs::home_dir().map(|h| h.join(".review-insights").join("config.toml")),
            dirs::config_dir().map(|c| c.join("review-insights").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InsightsError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| InsightsError::Config(format!("Failed to parse config: {e}")))
    }
}

/// Hosted inference API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL that model ids are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Emotion classification model id
    #[serde(default = "default_emotion_model")]
    pub emotion_model: String,
    /// Summarization model id
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            emotion_model: default_emotion_model(),
            summary_model: default_summary_model(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_emotion_model() -> String {
    "j-hartmann/emotion-english-distilroberta-base".to_string()
}

fn default_summary_model() -> String {
    "facebook/bart-large-cnn".to_string()
}

fn default_token_env() -> String {
    "HF_API_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Retry configuration for the three remote call sites
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Attempt ceiling for the connectivity probe and summarization calls
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait between connectivity probe attempts while the model loads
    #[serde(default = "default_probe_backoff_secs")]
    pub probe_backoff_secs: u64,
    /// Wait between summarization attempts while the model loads
    #[serde(default = "default_summary_backoff_secs")]
    pub summary_backoff_secs: u64,
    /// Attempt ceiling for per-review emotion classification
    #[serde(default = "default_classify_attempts")]
    pub classify_attempts: u32,
    /// Wait between classification attempts while the model loads
    #[serde(default = "default_classify_backoff_secs")]
    pub classify_backoff_secs: u64,
}

impl RetryConfig {
    pub fn probe_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.probe_backoff_secs),
        )
    }

    pub fn summary_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.summary_backoff_secs),
        )
    }

    pub fn classify_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.classify_attempts,
            Duration::from_secs(self.classify_backoff_secs),
        )
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            probe_backoff_secs: default_probe_backoff_secs(),
            summary_backoff_secs: default_summary_backoff_secs(),
            classify_attempts: default_classify_attempts(),
            classify_backoff_secs: default_classify_backoff_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_probe_backoff_secs() -> u64 {
    20
}

fn default_summary_backoff_secs() -> u64 {
    2
}

fn default_classify_attempts() -> u32 {
    1
}

fn default_classify_backoff_secs() -> u64 {
    2
}

/// Parameters sent with every summarization request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizerConfig {
    /// Hard cap on characters sent to the summarization model
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    /// Maximum summary length in model tokens
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    /// Minimum summary length in model tokens
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    /// Sample instead of deterministic decoding
    #[serde(default)]
    pub do_sample: bool,
    /// Beam search width
    #[serde(default = "default_num_beams")]
    pub num_beams: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            do_sample: false,
            num_beams: default_num_beams(),
        }
    }
}

fn default_max_input_chars() -> usize {
    1000
}

fn default_max_length() -> u32 {
    75
}

fn default_min_length() -> u32 {
    30
}

fn default_num_beams() -> u32 {
    4
}

/// Pipeline execution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Maximum in-flight remote calls (1 = strictly sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Where the downloadable report is written
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            report_path: default_report_path(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

fn default_report_path() -> PathBuf {
    PathBuf::from("review_analysis.txt")
}
