use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Rollout stage of a platform module.
///
/// Stages before `Deprecated` are ordered; `Deprecated` is terminal and
/// sits outside the forward path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RolloutStage {
    Concept,
    Development,
    InternalTesting,
    Beta,
    LimitedRelease,
    GeneralAvailability,
    Deprecated,
}

impl RolloutStage {
    pub fn next(self) -> Option<Self> {
        use RolloutStage::*;
        match self {
            Concept => Some(Development),
            Development => Some(InternalTesting),
            InternalTesting => Some(Beta),
            Beta => Some(LimitedRelease),
            LimitedRelease => Some(GeneralAvailability),
            GeneralAvailability | Deprecated => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        use RolloutStage::*;
        match self {
            Development => Some(Concept),
            InternalTesting => Some(Development),
            Beta => Some(InternalTesting),
            LimitedRelease => Some(Beta),
            GeneralAvailability => Some(LimitedRelease),
            Concept | Deprecated => None,
        }
    }

    /// Stages where only a share of users see the module
    pub fn is_partial(self) -> bool {
        matches!(self, RolloutStage::Beta | RolloutStage::LimitedRelease)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: RolloutStage,
    pub to: RolloutStage,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub key: String,
    pub name: String,
    pub pillar: String,
    pub description: String,
    pub owner: String,
    pub stage: RolloutStage,
    pub rollout_percentage: u8,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub history: Vec<StageTransition>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn next_and_previous_are_inverse_on_the_forward_path() {
        for stage in RolloutStage::iter().filter(|s| *s != RolloutStage::Deprecated) {
            if let Some(next) = stage.next() {
                assert_eq!(next.previous(), Some(stage));
                assert!(next > stage);
            }
        }
    }

    #[test]
    fn terminal_stages() {
        assert_eq!(RolloutStage::GeneralAvailability.next(), None);
        assert_eq!(RolloutStage::Deprecated.next(), None);
        assert_eq!(RolloutStage::Deprecated.previous(), None);
        assert_eq!(RolloutStage::Concept.previous(), None);
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(RolloutStage::GeneralAvailability.to_string(), "general_availability");
        assert_eq!("internal_testing".parse::<RolloutStage>().unwrap(), RolloutStage::InternalTesting);
    }
}
