//! Per-aspect summarization
//!
//! Lines of a bucket are joined, de-duplicated at the period level, capped
//! in length and sent to the summarization model. The first summary is
//! tidied up and turned into a bullet.

use std::fmt;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aspects::{Aspect, AspectBuckets};
use crate::config::SummarizerConfig;
use crate::inference::{InferenceSession, SummaryParams};

/// One line of the analysis: `• {Aspect}: {summary}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryBullet {
    pub aspect: Aspect,
    pub summary: String,
}

impl fmt::Display for SummaryBullet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "• {}: {}", self.aspect.title(), self.summary)
    }
}

/// Join bucket lines with single spaces
pub fn combine_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Period-delimited fragments with repeats removed, first occurrence kept.
///
/// Splits on the literal `.` character, so abbreviations and decimals are
/// split too. Empty fragments take part in de-duplication like any other.
pub fn dedup_fragments<'t, I>(fragments: I) -> Vec<&'t str>
where
    I: IntoIterator<Item = &'t str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for fragment in fragments {
        if !seen.contains(&fragment) {
            seen.push(fragment);
        }
    }
    seen
}

/// Split on `.`, drop repeated fragments and rejoin with `". "`
pub fn dedup_sentences(text: &str) -> String {
    dedup_fragments(text.split('.')).join(". ")
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Model input for one bucket: combine, de-duplicate, truncate
pub fn prepare_input<S: AsRef<str>>(lines: &[S], max_chars: usize) -> String {
    let combined = dedup_sentences(&combine_lines(lines));
    truncate_chars(&combined, max_chars).to_string()
}

/// Tidy a raw model summary. Returns `None` for blank output.
pub fn clean_summary(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let collapsed = trimmed.replace(" .", ".").replace("..", ".");
    let mut chars = collapsed.chars();
    let mut summary = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return None,
    };
    if !summary.ends_with('.') {
        summary.push('.');
    }
    Some(summary)
}

/// Summarizes aspect buckets through the session's summarization model
pub struct AspectSummarizer<'a> {
    session: &'a InferenceSession,
    config: SummarizerConfig,
    params: SummaryParams,
}

impl<'a> AspectSummarizer<'a> {
    pub fn new(session: &'a InferenceSession, config: &SummarizerConfig) -> Self {
        Self {
            session,
            params: SummaryParams::from(config),
            config: config.clone(),
        }
    }

    /// Summarize one bucket. Empty buckets and failed calls give `None`.
    pub async fn summarize<S: AsRef<str>>(
        &self,
        aspect: Aspect,
        lines: &[S],
    ) -> Option<SummaryBullet> {
        if lines.is_empty() || !self.session.is_available() {
            return None;
        }

        let input = prepare_input(lines, self.config.max_input_chars);
        debug!(
            "Summarizing {} ({} lines, {} chars)",
            aspect,
            lines.len(),
            input.chars().count()
        );

        let summaries = match self
            .session
            .provider()
            .summarize(&input, &self.params)
            .await
        {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!("Skipping {} summary: {}", aspect, e);
                return None;
            }
        };

        let summary = summaries.first().and_then(|raw| clean_summary(raw))?;
        Some(SummaryBullet { aspect, summary })
    }

    /// Summarize every non-empty bucket, in aspect order
    pub async fn summarize_all(
        &self,
        buckets: &AspectBuckets,
        concurrency: usize,
    ) -> Vec<SummaryBullet> {
        let bullets: Vec<SummaryBullet> = stream::iter(buckets.non_empty())
            .map(|(aspect, lines)| self.summarize(aspect, lines))
            .buffered(concurrency.max(1))
            .filter_map(|bullet| async move { bullet })
            .collect()
            .await;

        info!("Generated {} aspect summaries", bullets.len());
        bullets
    }
}
