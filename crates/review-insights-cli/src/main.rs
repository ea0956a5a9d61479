use std::path::PathBuf;

use clap::{Parser, Subcommand};
use review_insights::config::Config;
use review_insights_cli::commands::{AnalyzeCommand, ConfigCommand, ProbeCommand};
use review_insights_cli::error::CliResult;
use review_insights_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "review-insights")]
#[command(about = "Review Insights - Sentiment and aspect analysis for customer reviews")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Analyze a CSV file of reviews")]
    Analyze(AnalyzeCommand),

    #[clap(about = "Check that the hosted models are reachable")]
    Probe(ProbeCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,review_insights=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Analyze(cmd) => cmd.execute(&config, format).await,
        Command::Probe(cmd) => cmd.execute(&config, format).await,
        Command::Config(cmd) => cmd.execute(&config, format).await,
    }
}
