use parking_lot::RwLock;

use crate::bpoc::{ModuleMap, RolloutError};
use crate::domain::{ModuleRecord, RolloutStage};

/// The `module_records` collection
#[derive(Default)]
pub struct ModuleRepository {
    modules: RwLock<ModuleMap>,
}

impl ModuleRepository {
    /// Insert records whose keys are not present yet; returns how many were added.
    pub fn seed(&self, records: Vec<ModuleRecord>) -> usize {
        let mut modules = self.modules.write();
        let mut added = 0;
        for record in records {
            if !modules.contains_key(&record.key) {
                modules.insert(record.key.clone(), record);
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, key: &str) -> Option<ModuleRecord> {
        self.modules.read().get(key).cloned()
    }

    pub fn list(&self, stage: Option<RolloutStage>) -> Vec<ModuleRecord> {
        self.modules
            .read()
            .values()
            .filter(|m| stage.map_or(true, |s| m.stage == s))
            .cloned()
            .collect()
    }

    /// Run a rollout operation against the whole catalogue under one write lock.
    pub fn transact<T>(
        &self,
        op: impl FnOnce(&mut ModuleMap) -> Result<T, RolloutError>,
    ) -> Result<T, RolloutError> {
        op(&mut self.modules.write())
    }
}
