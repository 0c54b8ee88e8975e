use parking_lot::RwLock;
use std::collections::VecDeque;

use crate::adcs::{Decision, Verdict};

/// Bounded log of decision-control outcomes, newest last
pub struct DecisionLog {
    entries: RwLock<VecDeque<Decision>>,
    limit: usize,
}

impl DecisionLog {
    pub fn new(limit: usize) -> Self {
        Self { entries: RwLock::new(VecDeque::new()), limit: limit.max(1) }
    }

    pub fn record(&self, decision: Decision) {
        let mut entries = self.entries.write();
        if entries.len() == self.limit {
            entries.pop_front();
        }
        entries.push_back(decision);
    }

    /// Most recent first, optionally filtered by verdict
    pub fn recent(&self, verdict: Option<Verdict>, limit: usize) -> Vec<Decision> {
        self.entries
            .read()
            .iter()
            .rev()
            .filter(|d| verdict.map_or(true, |v| d.verdict == v))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
