use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliResult;

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Width of a 100% sentiment bar
const BAR_WIDTH: usize = 40;

/// Shorten to at most `max_chars` characters, marking the cut with "..."
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Horizontal bar proportional to `percent`
pub fn sentiment_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

/// Spinner for long-running remote work, hidden in JSON mode
pub fn spinner(message: &str, format: OutputFormat) -> CliResult<ProgressBar> {
    if matches!(format, OutputFormat::Json) {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .map_err(|e| format!("Progress bar error: {e}"))?;
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}
