use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum BdiiError {
    #[error("forecast horizon must be between 1 and {max} days, got {got}")]
    InvalidHorizon { got: u32, max: u32 },
}

/// Per-model unit counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySnapshot {
    pub model_id: String,
    pub model_name: String,
    pub total: u32,
    pub available: u32,
    pub assigned: u32,
    pub reserved: u32,
    pub in_repair: u32,
    pub retired: u32,
    /// assigned / (total - retired), 0 when nothing is in service
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeEligibility {
    pub user_id: String,
    pub unit_id: Uuid,
    pub current_model_id: String,
    pub eligible: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_model_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandForecast {
    pub model_id: String,
    pub horizon_days: u32,
    /// Units currently assigned
    pub baseline: u32,
    /// Upgrades expected to land on this model
    pub upgrade_demand: u32,
    /// New assignments expected from member growth
    pub growth_demand: u32,
    pub total_demand: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PurchaseAction {
    Purchase,
    Hold,
    Redistribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseRecommendation {
    pub model_id: String,
    pub supply: u32,
    pub demand: u32,
    pub safety_stock: u32,
    pub shortage: u32,
    pub surplus: u32,
    pub action: PurchaseAction,
    pub priority: Priority,
}
