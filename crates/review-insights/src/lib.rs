//! Review Insights - sentiment and aspect summaries for customer reviews
//!
//! This crate loads a CSV export of reviews, classifies each review's
//! sentiment through a hosted emotion model, groups review lines by topical
//! aspect and asks a hosted summarization model for one bullet per aspect.

pub mod aspects;
pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod sentiment;
pub mod summarizer;

pub use error::InsightsError;
