pub mod commands;
pub mod error;
pub mod output;

pub use commands::{AnalyzeCommand, ConfigCommand, ProbeCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_timestamp, sentiment_bar, truncate_string};
