use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Verdict {
    Allow,
    Deny,
    RequireHuman,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActorRole {
    Anonymous,
    Member,
    Moderator,
    Admin,
    /// Internal jobs; ranks with admin for permission checks
    System,
}

impl ActorRole {
    pub fn rank(self) -> u8 {
        match self {
            ActorRole::Anonymous => 0,
            ActorRole::Member => 1,
            ActorRole::Moderator => 2,
            ActorRole::Admin | ActorRole::System => 3,
        }
    }

    pub fn satisfies(self, required: ActorRole) -> bool {
        self.rank() >= required.rank()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Who is acting, as sent alongside write requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Actor {
    #[validate(length(min = 1, max = 128))]
    pub actor_id: String,
    pub actor_role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self { actor_id: id.into(), actor_role: role }
    }

    pub fn request(&self, action: impl Into<String>) -> ActionRequest {
        ActionRequest::new(self.actor_id.clone(), self.actor_role, action)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActionRequest {
    #[validate(length(min = 1, max = 128))]
    pub actor_id: String,
    pub actor_role: ActorRole,
    #[validate(length(min = 1, max = 128))]
    pub action: String,
    #[serde(default = "one")]
    pub target_count: u32,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub reason: Option<String>,
}

fn one() -> u32 {
    1
}

impl ActionRequest {
    pub fn new(actor_id: impl Into<String>, actor_role: ActorRole, action: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            actor_role,
            action: action.into(),
            target_count: 1,
            amount: None,
            environment: Environment::default(),
            reason: None,
        }
    }

    pub fn with_targets(mut self, count: u32) -> Self {
        self.target_count = count;
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn in_environment(mut self, env: Environment) -> Self {
        self.environment = env;
        self
    }
}

/// Outcome of one rule in the evaluation trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub fired: bool,
    pub verdict: Option<Verdict>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub request: ActionRequest,
    pub verdict: Verdict,
    pub rule_id: String,
    pub reason: String,
    pub trace: Vec<RuleResult>,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}
