//! In-process document collections.
//!
//! Each repository owns one or more collections behind a `parking_lot`
//! lock. Locks are never held across `.await`, so handlers call these
//! synchronously.

pub mod decisions;
pub mod devices;
pub mod feed;
pub mod modules;
pub mod opportunities;

pub use decisions::DecisionLog;
pub use devices::DeviceRepository;
pub use feed::FeedRepository;
pub use modules::ModuleRepository;
pub use opportunities::OpportunityRepository;

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Error, PartialEq)]
pub enum RepoError {
    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("{collection} {id} already exists")]
    Conflict { collection: &'static str, id: String },
}

impl RepoError {
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        Self::NotFound { collection, id: id.to_string() }
    }

    pub fn conflict(collection: &'static str, id: impl ToString) -> Self {
        Self::Conflict { collection, id: id.to_string() }
    }
}

pub struct Repositories {
    pub devices: DeviceRepository,
    pub opportunities: OpportunityRepository,
    pub modules: ModuleRepository,
    pub feed: FeedRepository,
    pub decisions: DecisionLog,
}

impl Repositories {
    pub fn new(cfg: &Config) -> Result<Self> {
        let modules = ModuleRepository::default();
        let seeded = modules.seed(crate::bpoc::seed_modules(chrono::Utc::now())?);
        info!(seeded, "module catalogue loaded");

        Ok(Self {
            devices: DeviceRepository::default(),
            opportunities: OpportunityRepository::default(),
            modules,
            feed: FeedRepository::default(),
            decisions: DecisionLog::new(cfg.adcs.history_limit),
        })
    }
}
