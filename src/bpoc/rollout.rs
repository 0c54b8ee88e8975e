use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::info;

use super::RolloutError;
use crate::domain::{ModuleRecord, RolloutStage, StageTransition};

pub type ModuleMap = BTreeMap<String, ModuleRecord>;

/// Who moved a module and why
#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub actor: String,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

impl TransitionContext {
    pub fn new(actor: impl Into<String>, note: Option<String>) -> Self {
        Self { actor: actor.into(), note, at: Utc::now() }
    }
}

fn module_mut<'a>(modules: &'a mut ModuleMap, key: &str) -> Result<&'a mut ModuleRecord, RolloutError> {
    modules.get_mut(key).ok_or_else(|| RolloutError::NotFound(key.to_string()))
}

fn record_transition(module: &mut ModuleRecord, to: RolloutStage, ctx: &TransitionContext) {
    let from = module.stage;
    module.history.push(StageTransition {
        from,
        to,
        actor: ctx.actor.clone(),
        note: ctx.note.clone(),
        at: ctx.at,
    });
    module.stage = to;
    module.updated_at = ctx.at;
    info!(module = %module.key, %from, %to, actor = %ctx.actor, "module stage changed");
}

/// Move a module one stage forward.
pub fn advance(modules: &mut ModuleMap, key: &str, ctx: &TransitionContext) -> Result<ModuleRecord, RolloutError> {
    let current = modules
        .get(key)
        .ok_or_else(|| RolloutError::NotFound(key.to_string()))?;
    let next = current.stage.next().ok_or_else(|| RolloutError::InvalidTransition {
        key: key.to_string(),
        stage: current.stage,
        op: "advance",
    })?;

    if next == RolloutStage::GeneralAvailability {
        if let Some(dep) = current.dependencies.iter().find(|d| {
            modules.get(d.as_str()).map(|m| m.stage) != Some(RolloutStage::GeneralAvailability)
        }) {
            return Err(RolloutError::DependencyNotReady {
                key: key.to_string(),
                dependency: dep.clone(),
            });
        }
    }

    let module = module_mut(modules, key)?;
    record_transition(module, next, ctx);
    module.rollout_percentage = match next {
        RolloutStage::Beta => module.rollout_percentage.max(10),
        RolloutStage::LimitedRelease => module.rollout_percentage.max(50),
        RolloutStage::GeneralAvailability => 100,
        _ => module.rollout_percentage,
    };
    Ok(module.clone())
}

/// Move a module one stage back.
pub fn rollback(modules: &mut ModuleMap, key: &str, ctx: &TransitionContext) -> Result<ModuleRecord, RolloutError> {
    let module = module_mut(modules, key)?;
    let prev = module.stage.previous().ok_or_else(|| RolloutError::InvalidTransition {
        key: key.to_string(),
        stage: module.stage,
        op: "roll back",
    })?;
    let leaving_ga = module.stage == RolloutStage::GeneralAvailability;

    record_transition(module, prev, ctx);
    if leaving_ga {
        module.rollout_percentage = module.rollout_percentage.min(50);
    }
    if !prev.is_partial() && prev != RolloutStage::GeneralAvailability {
        module.rollout_percentage = 0;
    }
    Ok(module.clone())
}

/// Retire a module. Refused while other live modules depend on it.
pub fn deprecate(modules: &mut ModuleMap, key: &str, ctx: &TransitionContext) -> Result<ModuleRecord, RolloutError> {
    let stage = modules
        .get(key)
        .map(|m| m.stage)
        .ok_or_else(|| RolloutError::NotFound(key.to_string()))?;
    if stage == RolloutStage::Deprecated {
        return Err(RolloutError::InvalidTransition {
            key: key.to_string(),
            stage,
            op: "deprecate",
        });
    }

    let dependents: Vec<String> = modules
        .values()
        .filter(|m| m.stage != RolloutStage::Deprecated && m.dependencies.iter().any(|d| d == key))
        .map(|m| m.key.clone())
        .collect();
    if !dependents.is_empty() {
        return Err(RolloutError::HasDependents { key: key.to_string(), dependents });
    }

    let module = module_mut(modules, key)?;
    record_transition(module, RolloutStage::Deprecated, ctx);
    module.rollout_percentage = 0;
    Ok(module.clone())
}

/// Adjust the share of users who see a module in beta or limited release.
pub fn set_rollout(modules: &mut ModuleMap, key: &str, pct: u8, at: DateTime<Utc>) -> Result<ModuleRecord, RolloutError> {
    if pct > 100 {
        return Err(RolloutError::InvalidPercentage(pct));
    }
    let module = module_mut(modules, key)?;
    if !module.stage.is_partial() {
        return Err(RolloutError::RolloutFixed(module.stage));
    }
    module.rollout_percentage = pct;
    module.updated_at = at;
    info!(module = %key, pct, "rollout percentage changed");
    Ok(module.clone())
}

/// Whether `user_id` falls inside the module's rollout.
///
/// Buckets are stable across restarts: FNV-1a over `key:user_id`, mod 100.
pub fn is_enabled_for(module: &ModuleRecord, user_id: &str) -> bool {
    match module.stage {
        RolloutStage::GeneralAvailability => true,
        stage if stage.is_partial() => rollout_bucket(&module.key, user_id) < module.rollout_percentage,
        _ => false,
    }
}

pub fn rollout_bucket(key: &str, user_id: &str) -> u8 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = key
        .bytes()
        .chain(std::iter::once(b':'))
        .chain(user_id.bytes())
        .fold(OFFSET, |h, b| (h ^ b as u64).wrapping_mul(PRIME));
    (hash % 100) as u8
}
