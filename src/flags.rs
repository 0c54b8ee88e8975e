use serde::Serialize;
use std::collections::BTreeMap;

pub const OPPORTUNITIES: &str = "opportunities";
pub const SOCIAL_FEED: &str = "social_feed";

/// Static on/off switches read from `[features]`
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureFlags {
    flags: BTreeMap<String, bool>,
}

impl FeatureFlags {
    pub fn new(flags: BTreeMap<String, bool>) -> Self {
        Self { flags }
    }

    /// Unknown flags are off
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn all(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}
