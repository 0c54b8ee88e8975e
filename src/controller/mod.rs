pub mod error;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub use error::PlatformError;

use crate::adcs::{ActionRequest, Actor, Decision, Environment, RulesEngine, Verdict};
use crate::bcee::CurrencyService;
use crate::bdii::{BdiiEngine, DemandForecast, InventorySnapshot, PurchaseRecommendation, UpgradeEligibility};
use crate::bpoc::{self, TransitionContext};
use crate::config::Config;
use crate::domain::{
    FeedPost, ModuleRecord, NewOpportunity, Opportunity, OpportunityStatus, ReviewDecision,
};
use crate::flags::{self, FeatureFlags};
use crate::moderation::{self, ContentKind, ContentSample, ModerationAction, Moderator, SentimentSummary};
use crate::repo::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub controller: Arc<PlatformController>,
    pub repos: Arc<Repositories>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let repos = Arc::new(Repositories::new(&cfg)?);

        let controller = Arc::new(PlatformController {
            bdii: BdiiEngine::new(cfg.bdii.clone()),
            adcs: RulesEngine::new(cfg.adcs.clone()),
            currency: CurrencyService::new(&cfg.bcee.default_currency)?,
            moderator: Moderator::new(&cfg.moderation),
            flags: FeatureFlags::new(cfg.features.clone()),
            environment: cfg.server.environment,
            repos: repos.clone(),
        });

        Ok(Self { cfg, controller, repos })
    }
}

/// Engines plus the collections they read, wired for the HTTP layer
pub struct PlatformController {
    pub bdii: BdiiEngine,
    pub adcs: RulesEngine,
    pub currency: CurrencyService,
    pub moderator: Moderator,
    pub flags: FeatureFlags,
    pub environment: Environment,
    pub repos: Arc<Repositories>,
}

impl PlatformController {
    pub fn require_feature(&self, name: &'static str) -> Result<(), PlatformError> {
        if self.flags.is_enabled(name) {
            Ok(())
        } else {
            Err(PlatformError::FeatureDisabled(name))
        }
    }

    /// Evaluate and log a decision without acting on it.
    pub fn evaluate_action(&self, req: ActionRequest) -> Decision {
        let decision = self.adcs.evaluate(req);
        self.repos.decisions.record(decision.clone());
        decision
    }

    /// Evaluate `action` for `actor` in this deployment and fail unless allowed.
    fn authorize(&self, actor: &Actor, action: &str) -> Result<Decision, PlatformError> {
        let decision = self.evaluate_action(actor.request(action).in_environment(self.environment));
        match decision.verdict {
            Verdict::Allow => Ok(decision),
            Verdict::Deny => Err(PlatformError::Denied(decision.reason)),
            Verdict::RequireHuman => Err(PlatformError::ReviewRequired(decision.reason)),
        }
    }

    // ---- device inventory -------------------------------------------------

    pub fn inventory(&self) -> Vec<InventorySnapshot> {
        let devices = &self.repos.devices;
        self.bdii.inventory_snapshot(&devices.list_models(), &devices.list_units())
    }

    pub fn upgrades(&self, now: DateTime<Utc>) -> Vec<UpgradeEligibility> {
        let devices = &self.repos.devices;
        self.bdii.upgrade_eligibility(
            &devices.list_links(),
            &devices.list_units(),
            &devices.list_models(),
            now,
        )
    }

    pub fn forecast(&self, horizon_days: u32) -> Result<Vec<DemandForecast>, PlatformError> {
        let snapshots = self.inventory();
        let upgrades = self.upgrades(Utc::now());
        Ok(self.bdii.demand_forecast(&snapshots, &upgrades, horizon_days)?)
    }

    pub fn recommendations(&self, horizon_days: u32) -> Result<Vec<PurchaseRecommendation>, PlatformError> {
        let snapshots = self.inventory();
        let upgrades = self.upgrades(Utc::now());
        let forecasts = self.bdii.demand_forecast(&snapshots, &upgrades, horizon_days)?;
        let recs = self.bdii.purchase_recommendations(&snapshots, &forecasts);
        info!(
            models = recs.len(),
            shortages = recs.iter().filter(|r| r.shortage > 0).count(),
            horizon_days,
            "purchase recommendations computed"
        );
        Ok(recs)
    }

    // ---- opportunities ----------------------------------------------------

    pub fn submit_opportunity(&self, new: NewOpportunity) -> Result<Opportunity, PlatformError> {
        self.require_feature(flags::OPPORTUNITIES)?;
        let currency = self.currency.info(&new.currency)?;
        let moderation = self
            .moderator
            .moderate(&format!("{}\n{}", new.title, new.description));

        let (status, review_note) = match moderation.action {
            ModerationAction::Reject => (OpportunityStatus::Rejected, Some(moderation.reasons.join("; "))),
            ModerationAction::Flag => (OpportunityStatus::Pending, Some(moderation.reasons.join("; "))),
            ModerationAction::Approve => (OpportunityStatus::Pending, None),
        };

        let opp = Opportunity {
            id: Uuid::new_v4(),
            title: new.title,
            organization: new.organization,
            kind: new.kind,
            description: new.description,
            location: new.location,
            compensation: new.compensation,
            currency: currency.code.to_string(),
            status,
            featured: false,
            submitted_by: new.submitted_by,
            created_at: Utc::now(),
            moderation,
            reviewed_by: None,
            review_note,
        };
        info!(id = %opp.id, status = %opp.status, action = %opp.moderation.action, "opportunity submitted");
        self.repos.opportunities.insert(opp.clone());
        Ok(opp)
    }

    pub fn review_opportunity(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        actor: &Actor,
        note: Option<String>,
    ) -> Result<Opportunity, PlatformError> {
        self.require_feature(flags::OPPORTUNITIES)?;
        // Fail fast on unknown ids before logging a decision
        self.repos
            .opportunities
            .find(id)
            .ok_or_else(|| crate::repo::RepoError::not_found("opportunity", id))?;
        self.authorize(actor, &decision.action_name())?;

        let reviewed = self.repos.opportunities.update(id, |opp| {
            match decision {
                ReviewDecision::Approve => opp.status = OpportunityStatus::Approved,
                ReviewDecision::Reject => {
                    opp.status = OpportunityStatus::Rejected;
                    opp.featured = false;
                }
                ReviewDecision::Feature => {
                    if opp.status != OpportunityStatus::Approved {
                        return Err(PlatformError::InvalidState(format!(
                            "only approved listings can be featured, {} is {}",
                            opp.id, opp.status
                        )));
                    }
                    opp.featured = true;
                }
                ReviewDecision::Unfeature => opp.featured = false,
            }
            opp.reviewed_by = Some(actor.actor_id.clone());
            if note.is_some() {
                opp.review_note = note;
            }
            Ok(opp.clone())
        })??;

        info!(id = %id, decision = %decision, reviewer = %actor.actor_id, "opportunity reviewed");
        Ok(reviewed)
    }

    // ---- feed -------------------------------------------------------------

    pub fn create_post(&self, author_id: &str, body: &str) -> Result<FeedPost, PlatformError> {
        self.require_feature(flags::SOCIAL_FEED)?;
        let moderation = self.moderator.moderate(body);
        if moderation.action == ModerationAction::Reject {
            warn!(author = %author_id, "post rejected by moderation");
            return Err(PlatformError::ContentRejected(moderation.reasons.join("; ")));
        }

        let post = FeedPost {
            id: Uuid::new_v4(),
            author_id: author_id.to_string(),
            body: body.to_string(),
            hidden: moderation.action == ModerationAction::Flag,
            moderation,
            created_at: Utc::now(),
        };
        if post.hidden {
            info!(id = %post.id, "post held for review");
        }
        self.repos.feed.insert(post.clone());
        Ok(post)
    }

    pub fn sentiment_summary(&self, since: Option<DateTime<Utc>>) -> SentimentSummary {
        let posts = self.repos.feed.all();
        let opportunities = self.repos.opportunities.all();

        let samples = posts
            .iter()
            .map(|p| ContentSample { kind: ContentKind::Post, created_at: p.created_at, outcome: &p.moderation })
            .chain(opportunities.iter().map(|o| ContentSample {
                kind: ContentKind::Opportunity,
                created_at: o.created_at,
                outcome: &o.moderation,
            }));
        moderation::aggregate(samples, since)
    }

    // ---- module rollout ---------------------------------------------------

    pub fn advance_module(&self, key: &str, actor: &Actor, note: Option<String>) -> Result<ModuleRecord, PlatformError> {
        self.require_module(key)?;
        self.authorize(actor, "module.advance")?;
        let ctx = TransitionContext::new(actor.actor_id.clone(), note);
        Ok(self.repos.modules.transact(|m| bpoc::advance(m, key, &ctx))?)
    }

    pub fn rollback_module(&self, key: &str, actor: &Actor, note: Option<String>) -> Result<ModuleRecord, PlatformError> {
        self.require_module(key)?;
        self.authorize(actor, "module.rollback")?;
        let ctx = TransitionContext::new(actor.actor_id.clone(), note);
        Ok(self.repos.modules.transact(|m| bpoc::rollback(m, key, &ctx))?)
    }

    pub fn deprecate_module(&self, key: &str, actor: &Actor, note: Option<String>) -> Result<ModuleRecord, PlatformError> {
        self.require_module(key)?;
        self.authorize(actor, "module.deprecate")?;
        let ctx = TransitionContext::new(actor.actor_id.clone(), note);
        Ok(self.repos.modules.transact(|m| bpoc::deprecate(m, key, &ctx))?)
    }

    pub fn set_module_rollout(&self, key: &str, pct: u8, actor: &Actor) -> Result<ModuleRecord, PlatformError> {
        self.require_module(key)?;
        self.authorize(actor, "module.rollout")?;
        Ok(self.repos.modules.transact(|m| bpoc::set_rollout(m, key, pct, Utc::now()))?)
    }

    /// Fail with 404 before a decision is logged for a key that does not exist.
    fn require_module(&self, key: &str) -> Result<ModuleRecord, PlatformError> {
        Ok(self
            .repos
            .modules
            .get(key)
            .ok_or_else(|| bpoc::RolloutError::NotFound(key.to_string()))?)
    }

    pub fn module_enabled_for(&self, key: &str, user_id: &str) -> Result<bool, PlatformError> {
        let module = self.require_module(key)?;
        Ok(bpoc::is_enabled_for(&module, user_id))
    }
}
