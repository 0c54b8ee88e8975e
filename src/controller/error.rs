use thiserror::Error;

use crate::bcee::CurrencyError;
use crate::bdii::BdiiError;
use crate::bpoc::RolloutError;
use crate::repo::RepoError;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Rollout(#[from] RolloutError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error(transparent)]
    Bdii(#[from] BdiiError),

    /// Decision control refused the action
    #[error("action denied: {0}")]
    Denied(String),

    /// Decision control wants a person to sign off
    #[error("human review required: {0}")]
    ReviewRequired(String),

    #[error("content rejected: {0}")]
    ContentRejected(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("feature disabled: {0}")]
    FeatureDisabled(&'static str),
}
