use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use uuid::Uuid;

use super::{
    BdiiError, DemandForecast, InventorySnapshot, Priority, PurchaseAction, PurchaseRecommendation,
    UpgradeEligibility,
};
use crate::config::BdiiConfig;
use crate::domain::{DeviceModel, DeviceUnit, UnitStatus, UserDeviceLink};

pub const MAX_HORIZON_DAYS: u32 = 730;

/// Float slack so exact products like 10 x 0.1 do not round up to 2
const CEIL_EPSILON: f64 = 1e-9;

fn ceil_u32(x: f64) -> u32 {
    (x - CEIL_EPSILON).ceil().max(0.0) as u32
}

/// Inventory and demand arithmetic over caller-supplied collections.
///
/// The engine holds only thresholds; every method is a pure function of
/// its inputs, so handlers can snapshot repositories and call it freely.
#[derive(Debug, Clone)]
pub struct BdiiEngine {
    cfg: BdiiConfig,
}

impl BdiiEngine {
    pub fn new(cfg: BdiiConfig) -> Self {
        Self { cfg }
    }

    /// Count units per model. Units referencing unknown models are skipped.
    pub fn inventory_snapshot(
        &self,
        models: &[DeviceModel],
        units: &[DeviceUnit],
    ) -> Vec<InventorySnapshot> {
        let mut by_model: BTreeMap<&str, InventorySnapshot> = models
            .iter()
            .map(|m| {
                (
                    m.id.as_str(),
                    InventorySnapshot {
                        model_id: m.id.clone(),
                        model_name: m.name.clone(),
                        ..Default::default()
                    },
                )
            })
            .collect();

        let mut orphaned = 0usize;
        for unit in units {
            let Some(snap) = by_model.get_mut(unit.model_id.as_str()) else {
                orphaned += 1;
                continue;
            };
            snap.total += 1;
            match unit.status {
                UnitStatus::Available => snap.available += 1,
                UnitStatus::Assigned => snap.assigned += 1,
                UnitStatus::Reserved => snap.reserved += 1,
                UnitStatus::InRepair => snap.in_repair += 1,
                UnitStatus::Retired => snap.retired += 1,
            }
        }
        if orphaned > 0 {
            debug!(orphaned, "units with unknown model ignored");
        }

        by_model
            .into_values()
            .map(|mut snap| {
                let in_service = snap.total - snap.retired;
                snap.utilization = if in_service == 0 {
                    0.0
                } else {
                    snap.assigned as f64 / in_service as f64
                };
                snap
            })
            .collect()
    }

    /// Decide, for every active link, whether its holder may upgrade and to what.
    pub fn upgrade_eligibility(
        &self,
        links: &[UserDeviceLink],
        units: &[DeviceUnit],
        models: &[DeviceModel],
        now: DateTime<Utc>,
    ) -> Vec<UpgradeEligibility> {
        let models_by_id: HashMap<&str, &DeviceModel> =
            models.iter().map(|m| (m.id.as_str(), m)).collect();
        let units_by_id: HashMap<Uuid, &DeviceUnit> = units.iter().map(|u| (u.id, u)).collect();

        links
            .iter()
            .filter(|link| link.active)
            .filter_map(|link| {
                let unit = units_by_id.get(&link.unit_id)?;
                let model = models_by_id.get(unit.model_id.as_str())?;
                let age = unit.age_years(now);

                let (eligible, mut reason) = if !model.supported {
                    (true, format!("model {} is no longer supported", model.id))
                } else if age >= self.cfg.upgrade_after_years {
                    (true, format!("unit is {} years old", age))
                } else {
                    (
                        false,
                        format!(
                            "unit is {} years old, upgrades open after {}",
                            age, self.cfg.upgrade_after_years
                        ),
                    )
                };

                let recommended_model_id = if eligible {
                    upgrade_target(model, models).map(|m| m.id.clone())
                } else {
                    None
                };
                if eligible && recommended_model_id.is_none() {
                    reason.push_str("; no upgrade target available");
                }

                Some(UpgradeEligibility {
                    user_id: link.user_id.clone(),
                    unit_id: unit.id,
                    current_model_id: model.id.clone(),
                    eligible,
                    reason,
                    recommended_model_id,
                })
            })
            .collect()
    }

    /// Project demand per model over `horizon_days`.
    pub fn demand_forecast(
        &self,
        snapshots: &[InventorySnapshot],
        eligibilities: &[UpgradeEligibility],
        horizon_days: u32,
    ) -> Result<Vec<DemandForecast>, BdiiError> {
        if horizon_days == 0 || horizon_days > MAX_HORIZON_DAYS {
            return Err(BdiiError::InvalidHorizon { got: horizon_days, max: MAX_HORIZON_DAYS });
        }

        let mut upgrades: HashMap<&str, u32> = HashMap::new();
        for target in eligibilities
            .iter()
            .filter(|e| e.eligible)
            .filter_map(|e| e.recommended_model_id.as_deref())
        {
            *upgrades.entry(target).or_default() += 1;
        }

        let years = horizon_days as f64 / 365.0;
        let forecasts = snapshots
            .iter()
            .map(|snap| {
                let baseline = snap.assigned;
                let upgrade_demand = upgrades.get(snap.model_id.as_str()).copied().unwrap_or(0);
                let growth_demand = ceil_u32(baseline as f64 * self.cfg.annual_growth_rate * years);
                DemandForecast {
                    model_id: snap.model_id.clone(),
                    horizon_days,
                    baseline,
                    upgrade_demand,
                    growth_demand,
                    total_demand: upgrade_demand + growth_demand,
                }
            })
            .collect::<Vec<_>>();

        debug!(models = forecasts.len(), horizon_days, "demand forecast computed");
        Ok(forecasts)
    }

    /// Compare forecast demand with available stock and suggest what to buy or move.
    pub fn purchase_recommendations(
        &self,
        snapshots: &[InventorySnapshot],
        forecasts: &[DemandForecast],
    ) -> Vec<PurchaseRecommendation> {
        let demand_by_model: HashMap<&str, u32> = forecasts
            .iter()
            .map(|f| (f.model_id.as_str(), f.total_demand))
            .collect();

        let mut recs: Vec<PurchaseRecommendation> = snapshots
            .iter()
            .map(|snap| {
                let supply = snap.available;
                let demand = demand_by_model.get(snap.model_id.as_str()).copied().unwrap_or(0);
                let safety_stock = ceil_u32(demand as f64 * self.cfg.safety_stock_ratio);
                let needed = demand + safety_stock;
                let shortage = needed.saturating_sub(supply);
                let surplus = supply.saturating_sub(needed);

                let action = if shortage > 0 {
                    PurchaseAction::Purchase
                } else if surplus > self.cfg.surplus_threshold {
                    PurchaseAction::Redistribute
                } else {
                    PurchaseAction::Hold
                };

                PurchaseRecommendation {
                    model_id: snap.model_id.clone(),
                    supply,
                    demand,
                    safety_stock,
                    shortage,
                    surplus,
                    action,
                    priority: priority_for(shortage, demand),
                }
            })
            .collect();

        recs.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.shortage.cmp(&a.shortage))
                .then(a.model_id.cmp(&b.model_id))
        });
        recs
    }
}

fn priority_for(shortage: u32, demand: u32) -> Priority {
    let ratio = shortage as f64 / demand.max(1) as f64;
    if ratio >= 0.5 {
        Priority::High
    } else if shortage > 0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Successor if it is still supported, otherwise the newest supported
/// model in the same category that is newer and at least as capable.
fn upgrade_target<'a>(current: &DeviceModel, models: &'a [DeviceModel]) -> Option<&'a DeviceModel> {
    if let Some(successor) = current
        .successor_id
        .as_deref()
        .and_then(|id| models.iter().find(|m| m.id == id))
        .filter(|m| m.supported)
    {
        return Some(successor);
    }

    models
        .iter()
        .filter(|m| {
            m.supported
                && m.id != current.id
                && m.category == current.category
                && m.release_year > current.release_year
                && m.tier >= current.tier
        })
        .max_by(|a, b| {
            (a.release_year, a.tier)
                .cmp(&(b.release_year, b.tier))
                .then(b.id.cmp(&a.id))
        })
}
