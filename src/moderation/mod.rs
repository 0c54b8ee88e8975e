//! Sentiment-driven moderation for member content.

pub mod analytics;
pub mod sentiment;

pub use analytics::*;
pub use sentiment::*;
