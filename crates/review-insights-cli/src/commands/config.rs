use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use review_insights::config::Config;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    #[clap(about = "Show the effective configuration")]
    Show,
}

impl ConfigCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show => Self::show(config, format),
        }
    }

    fn show(config: &Config, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Setting", "Value"]);

                for (key, value) in config_rows(config) {
                    table.add_row([key.to_string(), value]);
                }

                println!("{table}");
            }
        }
        Ok(())
    }
}

fn config_rows(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("api.base_url", config.api.base_url.clone()),
        ("api.emotion_model", config.api.emotion_model.clone()),
        ("api.summary_model", config.api.summary_model.clone()),
        ("api.token_env", config.api.token_env.clone()),
        ("api.timeout_secs", config.api.timeout_secs.to_string()),
        ("retry.max_attempts", config.retry.max_attempts.to_string()),
        (
            "retry.probe_backoff_secs",
            config.retry.probe_backoff_secs.to_string(),
        ),
        (
            "retry.summary_backoff_secs",
            config.retry.summary_backoff_secs.to_string(),
        ),
        (
            "retry.classify_attempts",
            config.retry.classify_attempts.to_string(),
        ),
        (
            "retry.classify_backoff_secs",
            config.retry.classify_backoff_secs.to_string(),
        ),
        (
            "summarizer.max_input_chars",
            config.summarizer.max_input_chars.to_string(),
        ),
        ("summarizer.max_length", config.summarizer.max_length.to_string()),
        ("summarizer.min_length", config.summarizer.min_length.to_string()),
        ("summarizer.do_sample", config.summarizer.do_sample.to_string()),
        ("summarizer.num_beams", config.summarizer.num_beams.to_string()),
        ("pipeline.concurrency", config.pipeline.concurrency.to_string()),
        (
            "pipeline.report_path",
            config.pipeline.report_path.display().to_string(),
        ),
    ]
}
