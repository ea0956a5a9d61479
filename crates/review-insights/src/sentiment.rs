//! Two-tier sentiment classification
//!
//! The emotion model supplies the primary signal. When its dominant emotion
//! is neither clearly positive nor clearly negative, a small keyword lexicon
//! decides. Any failure yields `Neutral`.

use std::fmt;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::inference::{EmotionScore, InferenceSession};

/// Minimum dominant-emotion confidence for the model path to decide
pub const EMOTION_THRESHOLD: f32 = 0.3;

pub const POSITIVE_EMOTIONS: &[&str] = &["joy", "optimism", "love"];
pub const NEGATIVE_EMOTIONS: &[&str] = &["anger", "disgust", "fear", "sadness"];

pub const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "delicious",
    "fantastic",
    "best",
];
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "poor",
    "terrible",
    "worst",
    "disappointing",
    "slow",
    "not",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    /// Slice colour used when charting the distribution
    pub fn chart_color(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "#00CC96",
            SentimentLabel::Negative => "#EF553B",
            SentimentLabel::Neutral => "#636EFA",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest-scoring emotion; ties keep the one the service listed first.
pub fn dominant_emotion(emotions: &[EmotionScore]) -> Option<&EmotionScore> {
    emotions.iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.score <= current.score => Some(current),
        Some(current) if candidate.score.is_nan() => Some(current),
        _ => Some(candidate),
    })
}

/// Map the dominant emotion to a label, deferring to the lexicon when the
/// emotion is ambiguous or below the threshold.
pub fn label_from_emotion(dominant: &EmotionScore, text: &str) -> SentimentLabel {
    let label = dominant.label.to_lowercase();
    if POSITIVE_EMOTIONS.contains(&label.as_str()) && dominant.score > EMOTION_THRESHOLD {
        SentimentLabel::Positive
    } else if NEGATIVE_EMOTIONS.contains(&label.as_str()) && dominant.score > EMOTION_THRESHOLD {
        SentimentLabel::Negative
    } else {
        lexical_sentiment(text)
    }
}

/// Count lexicon words present in `text` (each word at most once).
pub fn lexical_sentiment(text: &str) -> SentimentLabel {
    let lowered = text.to_lowercase();
    let positive = POSITIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    }
}

/// Classifies reviews against the session's emotion model
pub struct SentimentClassifier<'a> {
    session: &'a InferenceSession,
}

impl<'a> SentimentClassifier<'a> {
    pub fn new(session: &'a InferenceSession) -> Self {
        Self { session }
    }

    /// Classify one review. Total: never fails, falls back to `Neutral`.
    pub async fn classify(&self, review: &str) -> SentimentLabel {
        if !self.session.is_available() {
            return SentimentLabel::Neutral;
        }

        let emotions = match self.session.provider().classify_emotions(review).await {
            Ok(emotions) => emotions,
            Err(e) => {
                warn!("Error analyzing sentiment: {}", e);
                return SentimentLabel::Neutral;
            }
        };

        match dominant_emotion(&emotions) {
            Some(dominant) => {
                debug!("Dominant emotion {} ({:.3})", dominant.label, dominant.score);
                label_from_emotion(dominant, review)
            }
            None => {
                warn!("Emotion model returned no scores");
                SentimentLabel::Neutral
            }
        }
    }

    /// Classify every review with at most `concurrency` calls in flight.
    /// Output order matches input order.
    pub async fn classify_all<S: AsRef<str>>(
        &self,
        reviews: &[S],
        concurrency: usize,
    ) -> Vec<SentimentLabel> {
        stream::iter(reviews)
            .map(|review| self.classify(review.as_ref()))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

/// One slice of the sentiment distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentShare {
    pub label: SentimentLabel,
    pub count: usize,
    pub percent: f64,
    pub color: &'static str,
}

impl fmt::Display for SentimentShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: {} reviews ({:.1}%)",
            self.label.title(),
            self.count,
            self.percent
        )
    }
}

/// Label counts over one run, most frequent first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub total: usize,
    pub shares: Vec<SentimentShare>,
}

impl SentimentDistribution {
    /// Ties keep first-appearance order.
    pub fn from_labels(labels: &[SentimentLabel]) -> Self {
        let mut counts: Vec<(SentimentLabel, usize)> = Vec::new();
        for label in labels {
            match counts.iter_mut().find(|(seen, _)| seen == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((*label, 1)),
            }
        }
        // stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = labels.len();
        let shares = counts
            .into_iter()
            .map(|(label, count)| SentimentShare {
                label,
                count,
                percent: count as f64 / total as f64 * 100.0,
                color: label.chart_color(),
            })
            .collect();

        Self { total, shares }
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        self.shares
            .iter()
            .find(|share| share.label == label)
            .map_or(0, |share| share.count)
    }
}
