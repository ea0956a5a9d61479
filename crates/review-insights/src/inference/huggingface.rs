//! Hugging Face Inference API client
//!
//! Implements InferenceProvider over HTTP. Every request carries the bearer
//! token; HTTP 503 means the model is still loading and is retried with the
//! backoff configured for the call site.

use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::config::{ApiConfig, RetryConfig};
use crate::inference::InferenceProvider;
use crate::inference::types::{
    EmotionRequest, EmotionScore, InferenceError, RemoteResponse, SummaryOutput, SummaryParams,
    SummaryRequest,
};
use crate::retry::{RetryObserver, RetryPolicy};

const PROBE_INPUT: &str = "Test connection";

/// Pick the bearer token: an explicit value wins, then the environment.
///
/// A missing or blank token is a configuration error.
pub fn resolve_token(explicit: Option<&str>, token_env: &str) -> Result<String, InferenceError> {
    let token = match explicit {
        Some(token) => token.to_string(),
        None => env::var(token_env).map_err(|_| {
            InferenceError::Config(format!(
                "API token not provided and env var '{token_env}' not set"
            ))
        })?,
    };

    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(InferenceError::Config("API token is empty".to_string()));
    }
    Ok(token)
}

/// Client for the hosted emotion and summarization models
pub struct HuggingFaceClient {
    client: Client,
    token: String,
    emotion_url: Url,
    summary_url: Url,
    retry: RetryConfig,
    observer: Option<RetryObserver>,
}

impl fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("emotion_url", &self.emotion_url.as_str())
            .field("summary_url", &self.summary_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceClient {
    pub fn new(
        api: &ApiConfig,
        retry: &RetryConfig,
        token: String,
    ) -> Result<Self, InferenceError> {
        let emotion_url = model_url(&api.base_url, &api.emotion_model)?;
        let summary_url = model_url(&api.base_url, &api.summary_model)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Config(e.to_string()))?;

        info!(
            "HuggingFaceClient initialized with emotion model: {}, summary model: {}",
            api.emotion_model, api.summary_model
        );

        Ok(Self {
            client,
            token,
            emotion_url,
            summary_url,
            retry: retry.clone(),
            observer: None,
        })
    }

    /// Report each retry to `observer` in addition to the log
    pub fn with_retry_observer(mut self, observer: RetryObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// POST `payload` to `endpoint` under `policy`.
    ///
    /// Only HTTP 503 is retried. Any other non-success status returns
    /// immediately with the raw body attached to the error.
    pub async fn call<P>(
        &self,
        endpoint: &Url,
        payload: &P,
        policy: &RetryPolicy,
    ) -> Result<RemoteResponse, InferenceError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let response = policy
            .run(
                |attempt| self.post_once(endpoint, payload, attempt, policy.max_attempts()),
                InferenceError::is_retryable,
                self.observer.as_ref(),
            )
            .await?;

        debug!(
            "POST {} returned {} ({} bytes)",
            endpoint,
            response.status,
            response.body.len()
        );
        Ok(response)
    }

    async fn post_once<P>(
        &self,
        endpoint: &Url,
        payload: &P,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<RemoteResponse, InferenceError>
    where
        P: Serialize + Sync + ?Sized,
    {
        debug!("POST {} (attempt {}/{})", endpoint, attempt, max_attempts);

        let response = self
            .client
            .post(endpoint.clone())
            .header("Authorization", format!("Bearer {}", self.token))
            .json(payload)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(InferenceError::Unavailable {
                    status: status.as_u16(),
                    body,
                });
            }
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(RemoteResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn model_url(base_url: &str, model: &str) -> Result<Url, InferenceError> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        model.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|e| InferenceError::Config(format!("Invalid model URL '{raw}': {e}")))
}

#[async_trait]
impl InferenceProvider for HuggingFaceClient {
    async fn probe(&self) -> Result<(), InferenceError> {
        let request = EmotionRequest {
            inputs: PROBE_INPUT,
        };
        self.call(&self.emotion_url, &request, &self.retry.probe_policy())
            .await?;
        Ok(())
    }

    async fn classify_emotions(&self, text: &str) -> Result<Vec<EmotionScore>, InferenceError> {
        let request = EmotionRequest { inputs: text };
        let response = self
            .call(&self.emotion_url, &request, &self.retry.classify_policy())
            .await?;

        let mut distributions: Vec<Vec<EmotionScore>> = serde_json::from_str(&response.body)
            .map_err(|e| InferenceError::Parse(format!("Failed to parse emotion scores: {e}")))?;

        if distributions.is_empty() {
            return Err(InferenceError::Parse(
                "Emotion response contained no distributions".to_string(),
            ));
        }
        Ok(distributions.swap_remove(0))
    }

    async fn summarize(
        &self,
        text: &str,
        params: &SummaryParams,
    ) -> Result<Vec<String>, InferenceError> {
        let request = SummaryRequest {
            inputs: text,
            parameters: params,
        };
        let response = self
            .call(&self.summary_url, &request, &self.retry.summary_policy())
            .await?;

        let outputs: Vec<SummaryOutput> = serde_json::from_str(&response.body)
            .map_err(|e| InferenceError::Parse(format!("Failed to parse summaries: {e}")))?;

        Ok(outputs
            .into_iter()
            .map(|o| o.summary_text.unwrap_or_default())
            .collect())
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
