//! Inference provider trait
//!
//! Abstracts the hosted models so the classifier and summarizer can be
//! driven by the Hugging Face client or by an in-process stand-in.

use async_trait::async_trait;

use crate::inference::types::{EmotionScore, InferenceError, SummaryParams};

/// Trait for backends that serve the emotion and summarization models
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Check connectivity against the emotion model
    async fn probe(&self) -> Result<(), InferenceError>;

    /// Emotion distribution for one text, in the service's own order
    async fn classify_emotions(&self, text: &str) -> Result<Vec<EmotionScore>, InferenceError>;

    /// Candidate summaries for `text`; the first one is used
    async fn summarize(
        &self,
        text: &str,
        params: &SummaryParams,
    ) -> Result<Vec<String>, InferenceError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
