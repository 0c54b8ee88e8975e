use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::RolloutError;
use crate::domain::{ModuleRecord, RolloutStage};

const SEED_TOML: &str = include_str!("seed.toml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    modules: Vec<SeedModule>,
}

#[derive(Debug, Deserialize)]
struct SeedModule {
    key: String,
    name: String,
    pillar: String,
    description: String,
    owner: String,
    stage: RolloutStage,
    rollout_percentage: u8,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// Built-in module catalogue
pub fn seed_modules(now: DateTime<Utc>) -> Result<Vec<ModuleRecord>, RolloutError> {
    parse_seed(SEED_TOML, now)
}

pub fn parse_seed(raw: &str, now: DateTime<Utc>) -> Result<Vec<ModuleRecord>, RolloutError> {
    let file: SeedFile = toml::from_str(raw).map_err(|e| RolloutError::Seed(e.to_string()))?;

    let keys: Vec<&str> = file.modules.iter().map(|m| m.key.as_str()).collect();
    for m in &file.modules {
        if m.rollout_percentage > 100 {
            return Err(RolloutError::Seed(format!(
                "{}: rollout_percentage {} out of range",
                m.key, m.rollout_percentage
            )));
        }
        if let Some(missing) = m.dependencies.iter().find(|d| !keys.contains(&d.as_str())) {
            return Err(RolloutError::Seed(format!("{}: unknown dependency {}", m.key, missing)));
        }
    }

    Ok(file
        .modules
        .into_iter()
        .map(|m| ModuleRecord {
            key: m.key,
            name: m.name,
            pillar: m.pillar,
            description: m.description,
            owner: m.owner,
            stage: m.stage,
            rollout_percentage: m.rollout_percentage,
            dependencies: m.dependencies,
            history: Vec::new(),
            updated_at: now,
        })
        .collect())
}
