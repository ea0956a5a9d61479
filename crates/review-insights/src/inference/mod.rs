//! Remote inference for emotion classification and summarization
//!
//! The provider trait is the seam between the analysis components and the
//! hosted models; the session carries the provider and whether it answered
//! the connectivity probe.

pub mod huggingface;
pub mod provider;
pub mod session;
pub mod types;

pub use huggingface::{HuggingFaceClient, resolve_token};
pub use provider::InferenceProvider;
pub use session::{InferenceSession, ProbeOutcome};
pub use types::{EmotionScore, InferenceError, RemoteResponse, SummaryParams};
