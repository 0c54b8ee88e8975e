use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::moderation::ModerationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OpportunityKind {
    Job,
    Grant,
    Scholarship,
    Training,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OpportunityStatus {
    Pending,
    Approved,
    Rejected,
}

/// Moderator decision applied to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
    Feature,
    Unfeature,
}

impl ReviewDecision {
    /// Action name checked by the decision control layer
    pub fn action_name(&self) -> String {
        format!("opportunity.{}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub kind: OpportunityKind,
    pub description: String,
    pub location: Option<String>,
    pub compensation: Option<f64>,
    pub currency: String,
    pub status: OpportunityStatus,
    pub featured: bool,
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
    pub moderation: ModerationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
}

/// Listing as submitted by a member, before moderation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewOpportunity {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub organization: String,
    pub kind: OpportunityKind,
    #[validate(length(min = 10, max = 10000))]
    pub description: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub compensation: Option<f64>,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 128))]
    pub submitted_by: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Opportunity {
    pub fn is_public(&self) -> bool {
        self.status == OpportunityStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_maps_to_action_name() {
        assert_eq!(ReviewDecision::Approve.action_name(), "opportunity.approve");
        assert_eq!(ReviewDecision::Unfeature.action_name(), "opportunity.unfeature");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Scholarship".parse::<OpportunityKind>().unwrap(), OpportunityKind::Scholarship);
    }
}
