//! Wire types and errors for the hosted inference endpoints

use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;

/// One (label, confidence) pair from the emotion model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f32,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Generation parameters sent with a summarization request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
    pub num_beams: u32,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self::from(&SummarizerConfig::default())
    }
}

impl From<&SummarizerConfig> for SummaryParams {
    fn from(config: &SummarizerConfig) -> Self {
        Self {
            max_length: config.max_length,
            min_length: config.min_length,
            do_sample: config.do_sample,
            num_beams: config.num_beams,
        }
    }
}

/// Raw body of a successful remote call
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

/// `{"inputs": ...}` request used by the emotion model and the probe
#[derive(Debug, Serialize)]
pub(crate) struct EmotionRequest<'a> {
    pub inputs: &'a str,
}

/// Summarization request with generation parameters
#[derive(Debug, Serialize)]
pub(crate) struct SummaryRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a SummaryParams,
}

/// One element of the summarization response list
#[derive(Debug, Deserialize)]
pub(crate) struct SummaryOutput {
    #[serde(default)]
    pub summary_text: Option<String>,
}

/// Remote inference errors
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The model is still loading (HTTP 503); the only retryable state
    #[error("Model unavailable (HTTP {status}): {body}")]
    Unavailable { status: u16, body: String },
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InferenceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, InferenceError::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_params_serialize() {
        let params = SummaryParams::default();
        let json = serde_json::to_value(SummaryRequest {
            inputs: "text",
            parameters: &params,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "inputs": "text",
                "parameters": {
                    "max_length": 75,
                    "min_length": 30,
                    "do_sample": false,
                    "num_beams": 4
                }
            })
        );
    }

    #[test]
    fn test_emotion_scores_deserialize_nested() {
        let body = r#"[[{"label":"joy","score":0.8},{"label":"anger","score":0.1}]]"#;
        let parsed: Vec<Vec<EmotionScore>> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed[0][0], EmotionScore::new("joy", 0.8));
        assert_eq!(parsed[0].len(), 2);
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(
            InferenceError::Unavailable {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !InferenceError::Status {
                status: 429,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!InferenceError::Transport("reset".into()).is_retryable());
    }

    #[test]
    fn test_inference_error_display() {
        let err = InferenceError::Status {
            status: 401,
            body: "Invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 401: Invalid token");
    }
}
