//! Inference session: the provider plus its probed availability

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::inference::InferenceProvider;
use crate::inference::types::InferenceError;

/// Result of the start-of-session connectivity probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Connected,
    /// Every probe attempt saw the model still loading
    StillLoading,
    /// Non-retryable failure, with the error text for display
    Failed(String),
    /// The probe was not run
    Skipped,
}

impl ProbeOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ProbeOutcome::Connected | ProbeOutcome::Skipped)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Connected => write!(f, "✅ API connected successfully!"),
            ProbeOutcome::StillLoading => write!(
                f,
                "⚠️ Models are still loading. Please wait a minute and try again."
            ),
            ProbeOutcome::Failed(reason) => write!(f, "❌ API connection failed: {reason}"),
            ProbeOutcome::Skipped => write!(f, "Connectivity check skipped"),
        }
    }
}

/// Everything a run needs to talk to the models.
///
/// Replaces a process-wide "model available" flag: components receive the
/// session and consult `is_available` before making remote calls.
#[derive(Clone)]
pub struct InferenceSession {
    provider: Arc<dyn InferenceProvider>,
    available: bool,
}

impl fmt::Debug for InferenceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceSession")
            .field("provider", &self.provider.name())
            .field("available", &self.available)
            .finish()
    }
}

impl InferenceSession {
    /// Probe the provider and mark the session available only on success
    pub async fn connect(provider: Arc<dyn InferenceProvider>) -> (Self, ProbeOutcome) {
        let outcome = match provider.probe().await {
            Ok(()) => ProbeOutcome::Connected,
            Err(InferenceError::Unavailable { .. }) => ProbeOutcome::StillLoading,
            Err(e) => ProbeOutcome::Failed(match e {
                InferenceError::Status { body, .. } => body,
                other => other.to_string(),
            }),
        };

        if outcome.is_connected() {
            info!("Inference provider '{}' connected", provider.name());
        } else {
            warn!("Inference provider '{}' unavailable: {}", provider.name(), outcome);
        }

        let session = Self {
            provider,
            available: outcome.is_connected(),
        };
        (session, outcome)
    }

    /// Session that trusts the provider without probing it
    pub fn assume_available(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            available: true,
        }
    }

    /// Session whose remote calls are all short-circuited
    pub fn unavailable(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn provider(&self) -> &dyn InferenceProvider {
        self.provider.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{EmotionScore, SummaryParams};
    use async_trait::async_trait;

    struct ProbeOnly(Result<(), fn() -> InferenceError>);

    #[async_trait]
    impl InferenceProvider for ProbeOnly {
        async fn probe(&self) -> Result<(), InferenceError> {
            self.0.map_err(|make| make())
        }

        async fn classify_emotions(&self, _: &str) -> Result<Vec<EmotionScore>, InferenceError> {
            Ok(Vec::new())
        }

        async fn summarize(&self, _: &str, _: &SummaryParams) -> Result<Vec<String>, InferenceError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "probe-only"
        }
    }

    #[tokio::test]
    async fn test_connect_success() {
        let (session, outcome) = InferenceSession::connect(Arc::new(ProbeOnly(Ok(())))).await;
        assert_eq!(outcome, ProbeOutcome::Connected);
        assert!(session.is_available());
    }

    #[tokio::test]
    async fn test_connect_still_loading() {
        let provider = ProbeOnly(Err(|| InferenceError::Unavailable {
            status: 503,
            body: "loading".into(),
        }));
        let (session, outcome) = InferenceSession::connect(Arc::new(provider)).await;

        assert_eq!(outcome, ProbeOutcome::StillLoading);
        assert!(!session.is_available());
        assert!(outcome.to_string().contains("still loading"));
    }

    #[tokio::test]
    async fn test_connect_failed_shows_body() {
        let provider = ProbeOnly(Err(|| InferenceError::Status {
            status: 401,
            body: "Invalid username or password.".into(),
        }));
        let (session, outcome) = InferenceSession::connect(Arc::new(provider)).await;

        assert!(!session.is_available());
        assert_eq!(
            outcome.to_string(),
            "❌ API connection failed: Invalid username or password."
        );
    }

    #[test]
    fn test_assume_available_and_unavailable() {
        let provider: Arc<dyn InferenceProvider> = Arc::new(ProbeOnly(Ok(())));
        assert!(InferenceSession::assume_available(Arc::clone(&provider)).is_available());
        assert!(!InferenceSession::unavailable(provider).is_available());
    }
}
