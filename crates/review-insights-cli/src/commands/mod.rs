pub mod analyze;
pub mod config;
pub mod probe;

pub use analyze::AnalyzeCommand;
pub use config::ConfigCommand;
pub use probe::ProbeCommand;

use std::sync::Arc;

use indicatif::ProgressBar;
use review_insights::config::Config;
use review_insights::inference::{HuggingFaceClient, resolve_token};
use review_insights::retry::{RetryNotice, RetryObserver};

use crate::error::CliResult;

/// Build the hosted-model client, forwarding retry notices to `progress`
pub(crate) fn build_client(
    config: &Config,
    token: Option<&str>,
    progress: &ProgressBar,
) -> CliResult<Arc<HuggingFaceClient>> {
    let token = resolve_token(token, &config.api.token_env)?;

    let pb = progress.clone();
    let observer: RetryObserver = Arc::new(move |notice: &RetryNotice| {
        pb.set_message(notice.to_string());
    });

    let client = HuggingFaceClient::new(&config.api, &config.retry, token)?
        .with_retry_observer(observer);
    Ok(Arc::new(client))
}
