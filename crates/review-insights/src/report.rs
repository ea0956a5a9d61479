//! Report assembly
//!
//! Bullets are sorted by their full text and framed by a fixed header and
//! footer. A run that produced no bullets yields a notice instead.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::summarizer::SummaryBullet;

const REPORT_BANNER: &str = "📊 REVIEW ANALYSIS";
const REPORT_BANNER_RULE: &str = "================";
const REPORT_SECTION: &str = "Key Aspects:";
const REPORT_SECTION_RULE: &str = "----------------";
const REPORT_FOOTER: &str =
    "\nNote: This analysis summarizes the main feedback points from customer reviews.";

/// Title line prefixed to the saved report file
pub const DOWNLOAD_TITLE: &str = "Review Analysis Report";

pub const NO_SUMMARIES_NOTICE: &str =
    "Notice: Could not generate meaningful summaries. Please try again.";
pub const NOT_CONFIGURED_ERROR: &str =
    "Error: API is not properly configured. Please check your API key.";
pub const NO_CONTENT_ERROR: &str = "Error: No review content to analyze.";

/// Assembled analysis text for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Bullet lines in report order
    pub bullets: Vec<String>,
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// What the aspect analysis produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Report(AnalysisReport),
    /// Run completed without any usable summary
    Notice { message: String },
    /// Run could not be attempted
    Error { message: String },
}

impl AnalysisOutcome {
    pub fn notice(message: impl Into<String>) -> Self {
        AnalysisOutcome::Notice {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        AnalysisOutcome::Error {
            message: message.into(),
        }
    }

    /// Text shown to the user
    pub fn text(&self) -> &str {
        match self {
            AnalysisOutcome::Report(report) => &report.text,
            AnalysisOutcome::Notice { message } | AnalysisOutcome::Error { message } => message,
        }
    }

    pub fn is_report(&self) -> bool {
        matches!(self, AnalysisOutcome::Report(_))
    }

    /// Contents of the saved report file
    pub fn downloadable_text(&self) -> String {
        format!("{DOWNLOAD_TITLE}\n\n{}", self.text())
    }
}

/// Sort bullets and frame them. No bullets yields the notice outcome.
pub fn assemble(bullets: &[SummaryBullet]) -> AnalysisOutcome {
    if bullets.is_empty() {
        return AnalysisOutcome::notice(NO_SUMMARIES_NOTICE);
    }

    let mut lines: Vec<String> = bullets.iter().map(ToString::to_string).collect();
    lines.sort();

    let body = lines.join("\n");
    let text = [
        REPORT_BANNER,
        REPORT_BANNER_RULE,
        REPORT_SECTION,
        REPORT_SECTION_RULE,
        body.as_str(),
        REPORT_FOOTER,
    ]
    .join("\n\n");

    AnalysisOutcome::Report(AnalysisReport {
        bullets: lines,
        text,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::Aspect;

    fn bullet(aspect: Aspect, summary: &str) -> SummaryBullet {
        SummaryBullet {
            aspect,
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_assemble_sorts_bullets() {
        let outcome = assemble(&[
            bullet(Aspect::Service, "Slow at peak hours."),
            bullet(Aspect::Food, "Fresh and tasty."),
        ]);

        let AnalysisOutcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(
            report.bullets,
            vec![
                "• Food: Fresh and tasty.".to_string(),
                "• Service: Slow at peak hours.".to_string()
            ]
        );
        let food = report.text.find("• Food").unwrap();
        let service = report.text.find("• Service").unwrap();
        assert!(food < service);
    }

    #[test]
    fn test_assemble_layout() {
        let outcome = assemble(&[bullet(Aspect::Value, "Fair prices.")]);

        assert_eq!(
            outcome.text(),
            "📊 REVIEW ANALYSIS\n\n================\n\nKey Aspects:\n\n----------------\n\n\
             • Value: Fair prices.\n\n\nNote: This analysis summarizes the main feedback points from customer reviews."
        );
    }

    #[test]
    fn test_assemble_empty_is_notice() {
        let outcome = assemble(&[]);
        assert!(!outcome.is_report());
        assert_eq!(outcome.text(), NO_SUMMARIES_NOTICE);
    }

    #[test]
    fn test_downloadable_text_prefix() {
        let outcome = AnalysisOutcome::error(NO_CONTENT_ERROR);
        assert_eq!(
            outcome.downloadable_text(),
            "Review Analysis Report\n\nError: No review content to analyze."
        );
    }

    #[test]
    fn test_outcome_serializes_with_kind() {
        let json = serde_json::to_value(AnalysisOutcome::notice("nothing")).unwrap();
        assert_eq!(json["kind"], "notice");
        assert_eq!(json["message"], "nothing");
    }
}
