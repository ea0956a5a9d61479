use std::path::PathBuf;

use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use review_insights::config::Config;
use review_insights::inference::{InferenceSession, ProbeOutcome};
use review_insights::input::load_reviews;
use review_insights::pipeline::{AnalysisResult, ReviewPipeline};
use review_insights::report::AnalysisOutcome;
use review_insights::sentiment::SentimentDistribution;

use crate::commands::build_client;
use crate::commands::probe::status_name;
use crate::error::CliResult;
use crate::output::{OutputFormat, format_timestamp, sentiment_bar, spinner, truncate_string};

/// Review text width in the raw reviews table
const REVIEW_PREVIEW_CHARS: usize = 80;

#[derive(Parser)]
pub struct AnalyzeCommand {
    #[clap(help = "CSV file with a 'review' column")]
    pub csv: PathBuf,

    #[clap(long, help = "API token (defaults to the configured environment variable)")]
    pub token: Option<String>,

    #[clap(long, short, help = "Where to write the report file")]
    pub output: Option<PathBuf>,

    #[clap(long, help = "Do not write the report file")]
    pub no_report_file: bool,

    #[clap(long, help = "Skip the connectivity check and assume the API is up")]
    pub skip_probe: bool,

    #[clap(long, help = "Maximum concurrent API calls")]
    pub concurrency: Option<usize>,
}

impl AnalyzeCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let mut config = config.clone();
        if let Some(concurrency) = self.concurrency {
            config.pipeline.concurrency = concurrency.max(1);
        }

        let pb = spinner("Connecting to API...", format)?;
        let client = build_client(&config, self.token.as_deref(), &pb)?;

        let reviews = load_reviews(&self.csv).inspect_err(|_| pb.finish_and_clear())?;

        let (session, probe) = if self.skip_probe {
            (InferenceSession::assume_available(client), ProbeOutcome::Skipped)
        } else {
            InferenceSession::connect(client).await
        };
        if matches!(format, OutputFormat::Table) {
            pb.suspend(|| println!("{probe}\n"));
        }

        pb.set_message("Analyzing reviews...");
        let pipeline = ReviewPipeline::new(session, config.clone());
        let result = pipeline.run(&reviews).await;
        pb.finish_and_clear();

        let report_path = self.report_destination(&config);
        if let Some(path) = &report_path {
            std::fs::write(path, result.outcome.downloadable_text())?;
            tracing::info!("Report written to {}", path.display());
        }

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "probe": status_name(&probe),
                    "review_count": result.review_count(),
                    "sentiments": result.sentiments,
                    "distribution": result.distribution,
                    "analysis": result.outcome,
                    "report_path": report_path,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                print_reviews(&reviews, &result);
                print_distribution(&result.distribution);
                print_analysis(&result.outcome);

                if let Some(path) = &report_path {
                    println!("\nReport saved to {}", path.display());
                }
            }
        }

        Ok(())
    }

    fn report_destination(&self, config: &Config) -> Option<PathBuf> {
        if self.no_report_file {
            return None;
        }
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| config.pipeline.report_path.clone()),
        )
    }
}

fn print_reviews(reviews: &[String], result: &AnalysisResult) {
    println!("Raw Reviews ({})", reviews.len());
    println!("======================\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["#", "Review", "Sentiment"]);

    for (i, (review, sentiment)) in reviews.iter().zip(&result.sentiments).enumerate() {
        table.add_row([
            (i + 1).to_string(),
            truncate_string(review, REVIEW_PREVIEW_CHARS),
            sentiment.title().to_string(),
        ]);
    }

    println!("{table}\n");
}

fn distribution_table(distribution: &SentimentDistribution) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Sentiment", "Count", "Share", "Color", ""]);

    for share in &distribution.shares {
        table.add_row([
            share.label.title().to_string(),
            share.count.to_string(),
            format!("{:.1}%", share.percent),
            share.color.to_string(),
            sentiment_bar(share.percent),
        ]);
    }
    table
}

fn print_distribution(distribution: &SentimentDistribution) {
    println!("Sentiment Distribution");
    println!("======================\n");

    if distribution.is_empty() {
        println!("No reviews classified.\n");
        return;
    }

    println!("{}\n", distribution_table(distribution));
    println!("Sentiment Breakdown:");
    for share in &distribution.shares {
        println!("{share}");
    }
    println!();
}

fn print_analysis(outcome: &AnalysisOutcome) {
    println!("Analysis Results");
    println!("======================\n");
    println!("{}", outcome.text());

    if let AnalysisOutcome::Report(report) = outcome {
        println!("\nGenerated: {}", format_timestamp(&report.generated_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_insights::sentiment::SentimentLabel;

    fn command(output: Option<&str>, no_report_file: bool) -> AnalyzeCommand {
        AnalyzeCommand {
            csv: PathBuf::from("reviews.csv"),
            token: None,
            output: output.map(PathBuf::from),
            no_report_file,
            skip_probe: false,
            concurrency: None,
        }
    }

    #[test]
    fn test_report_destination_defaults_to_config() {
        let config = Config::default();
        assert_eq!(
            command(None, false).report_destination(&config),
            Some(PathBuf::from("review_analysis.txt"))
        );
    }

    #[test]
    fn test_report_destination_override_and_disable() {
        let config = Config::default();
        assert_eq!(
            command(Some("out/report.txt"), false).report_destination(&config),
            Some(PathBuf::from("out/report.txt"))
        );
        assert_eq!(command(Some("out/report.txt"), true).report_destination(&config), None);
    }

    #[test]
    fn test_distribution_table_rows() {
        let distribution = SentimentDistribution::from_labels(&[
            SentimentLabel::Negative,
            SentimentLabel::Positive,
            SentimentLabel::Positive,
        ]);
        let rendered = distribution_table(&distribution).to_string();

        assert!(rendered.contains("Positive"));
        assert!(rendered.contains("66.7%"));
        assert!(rendered.contains("#EF553B"));
        let positive = rendered.find("Positive").unwrap();
        let negative = rendered.find("Negative").unwrap();
        assert!(positive < negative);
    }
}
