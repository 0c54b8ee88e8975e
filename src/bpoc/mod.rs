pub mod rollout;
pub mod seed;

pub use rollout::*;
pub use seed::*;

use thiserror::Error;

use crate::domain::RolloutStage;

#[derive(Debug, Error, PartialEq)]
pub enum RolloutError {
    #[error("module {0} not found")]
    NotFound(String),

    #[error("module {key} cannot {op} from stage {stage}")]
    InvalidTransition { key: String, stage: RolloutStage, op: &'static str },

    #[error("module {key} depends on {dependency}, which is not generally available")]
    DependencyNotReady { key: String, dependency: String },

    #[error("module {key} is still required by {}", .dependents.join(", "))]
    HasDependents { key: String, dependents: Vec<String> },

    #[error("rollout percentage must be 0-100, got {0}")]
    InvalidPercentage(u8),

    #[error("rollout percentage cannot be changed in stage {0}")]
    RolloutFixed(RolloutStage),

    #[error("invalid seed data: {0}")]
    Seed(String),
}
