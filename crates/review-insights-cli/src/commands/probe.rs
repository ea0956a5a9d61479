use clap::Parser;
use review_insights::config::Config;
use review_insights::inference::{InferenceSession, ProbeOutcome};

use crate::commands::build_client;
use crate::error::CliResult;
use crate::output::{OutputFormat, spinner};

#[derive(Parser)]
pub struct ProbeCommand {
    #[clap(long, help = "API token (defaults to the configured environment variable)")]
    pub token: Option<String>,
}

impl ProbeCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let pb = spinner("Checking API connection...", format)?;
        let client = build_client(config, self.token.as_deref(), &pb)?;

        let (_, outcome) = InferenceSession::connect(client).await;
        pb.finish_and_clear();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "connected": outcome.is_connected(),
                    "status": status_name(&outcome),
                    "message": outcome.to_string(),
                    "emotion_model": config.api.emotion_model,
                    "summary_model": config.api.summary_model,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("{outcome}");
            }
        }

        if outcome.is_connected() {
            Ok(())
        } else {
            Err("API is not available".into())
        }
    }
}

pub(crate) fn status_name(outcome: &ProbeOutcome) -> &'static str {
    match outcome {
        ProbeOutcome::Connected => "connected",
        ProbeOutcome::StillLoading => "loading",
        ProbeOutcome::Failed(_) => "failed",
        ProbeOutcome::Skipped => "skipped",
    }
}
