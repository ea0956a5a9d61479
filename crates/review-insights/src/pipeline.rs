//! End-to-end analysis pipeline
//!
//! Sentiment is classified per review and aggregated; independently, all
//! reviews are joined into one block, routed into aspect buckets, summarized
//! and assembled into the report. The presentation layer only consumes the
//! returned `AnalysisResult`.

use serde::Serialize;
use tracing::info;

use crate::aspects;
use crate::config::Config;
use crate::inference::InferenceSession;
use crate::report::{self, AnalysisOutcome, NO_CONTENT_ERROR, NOT_CONFIGURED_ERROR};
use crate::sentiment::{SentimentClassifier, SentimentDistribution, SentimentLabel};
use crate::summarizer::AspectSummarizer;

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Sentiment per input review, in input order
    pub sentiments: Vec<SentimentLabel>,
    pub distribution: SentimentDistribution,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn review_count(&self) -> usize {
        self.sentiments.len()
    }
}

pub struct ReviewPipeline {
    session: InferenceSession,
    config: Config,
}

impl ReviewPipeline {
    pub fn new(session: InferenceSession, config: Config) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &InferenceSession {
        &self.session
    }

    /// Classify and summarize `reviews`
    pub async fn run<S: AsRef<str>>(&self, reviews: &[S]) -> AnalysisResult {
        info!("Analyzing {} reviews", reviews.len());

        let sentiments = self.classify_sentiments(reviews).await;
        let distribution = SentimentDistribution::from_labels(&sentiments);

        let combined = reviews
            .iter()
            .map(|review| review.as_ref())
            .collect::<Vec<&str>>()
            .join("\n");
        let outcome = self.analyze_reviews(&combined).await;

        AnalysisResult {
            sentiments,
            distribution,
            outcome,
        }
    }

    /// Per-review sentiment labels, in input order
    pub async fn classify_sentiments<S: AsRef<str>>(&self, reviews: &[S]) -> Vec<SentimentLabel> {
        SentimentClassifier::new(&self.session)
            .classify_all(reviews, self.config.pipeline.concurrency)
            .await
    }

    /// Aspect analysis over a newline-separated block of reviews
    pub async fn analyze_reviews(&self, reviews_text: &str) -> AnalysisOutcome {
        if !self.session.is_available() {
            return AnalysisOutcome::error(NOT_CONFIGURED_ERROR);
        }
        if reviews_text.trim().is_empty() {
            return AnalysisOutcome::error(NO_CONTENT_ERROR);
        }

        let buckets = aspects::route_text(reviews_text);
        let bullets = AspectSummarizer::new(&self.session, &self.config.summarizer)
            .summarize_all(&buckets, self.config.pipeline.concurrency)
            .await;

        report::assemble(&bullets)
    }
}
