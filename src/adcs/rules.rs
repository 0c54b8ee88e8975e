use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ActionRequest, ActorRole, Decision, Environment, RuleResult, Verdict};
use crate::config::AdcsConfig;

/// Built-in rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AnonymousActor,
    BlockedAction,
    RolePermission,
    BulkThreshold,
    FinancialThreshold,
    ProductionGuard,
    DefaultAllow,
}

pub const RULES: [Rule; 7] = [
    Rule::AnonymousActor,
    Rule::BlockedAction,
    Rule::RolePermission,
    Rule::BulkThreshold,
    Rule::FinancialThreshold,
    Rule::ProductionGuard,
    Rule::DefaultAllow,
];

impl Rule {
    pub fn id(self) -> &'static str {
        match self {
            Rule::AnonymousActor => "anonymous_actor",
            Rule::BlockedAction => "blocked_action",
            Rule::RolePermission => "role_permission",
            Rule::BulkThreshold => "bulk_threshold",
            Rule::FinancialThreshold => "financial_threshold",
            Rule::ProductionGuard => "production_guard",
            Rule::DefaultAllow => "default_allow",
        }
    }

    /// `Some` when the rule fires
    fn check(self, req: &ActionRequest, cfg: &AdcsConfig) -> Option<(Verdict, String)> {
        match self {
            Rule::AnonymousActor => (req.actor_role == ActorRole::Anonymous)
                .then(|| (Verdict::Deny, "anonymous actors cannot perform actions".to_string())),
            Rule::BlockedAction => cfg
                .blocked_actions
                .iter()
                .any(|a| a == &req.action)
                .then(|| (Verdict::Deny, format!("action {} is blocked", req.action))),
            Rule::RolePermission => {
                let required = required_role(cfg, &req.action);
                (!req.actor_role.satisfies(required)).then(|| {
                    (
                        Verdict::Deny,
                        format!("{} requires role {}, actor is {}", req.action, required, req.actor_role),
                    )
                })
            }
            Rule::BulkThreshold => (req.target_count > cfg.max_bulk_targets).then(|| {
                (
                    Verdict::RequireHuman,
                    format!(
                        "{} targets exceeds automatic limit of {}",
                        req.target_count, cfg.max_bulk_targets
                    ),
                )
            }),
            Rule::FinancialThreshold => req
                .amount
                .filter(|amount| *amount > cfg.max_auto_amount)
                .map(|amount| {
                    (
                        Verdict::RequireHuman,
                        format!("amount {:.2} exceeds automatic limit of {:.2}", amount, cfg.max_auto_amount),
                    )
                }),
            Rule::ProductionGuard => (req.environment == Environment::Production
                && cfg.production_sensitive_actions.iter().any(|a| a == &req.action)
                && !req.actor_role.satisfies(ActorRole::Admin))
            .then(|| {
                (
                    Verdict::RequireHuman,
                    format!("{} in production needs admin sign-off", req.action),
                )
            }),
            Rule::DefaultAllow => Some((Verdict::Allow, "no rule objected".to_string())),
        }
    }
}

fn required_role(cfg: &AdcsConfig, action: &str) -> ActorRole {
    cfg.required_roles.get(action).copied().unwrap_or(ActorRole::Member)
}

/// Evaluates action requests against the configured thresholds
#[derive(Debug, Clone)]
pub struct RulesEngine {
    cfg: AdcsConfig,
}

impl RulesEngine {
    pub fn new(cfg: AdcsConfig) -> Self {
        Self { cfg }
    }

    /// Run the rules in order; the first rule that fires decides.
    pub fn evaluate(&self, req: ActionRequest) -> Decision {
        let mut trace = Vec::with_capacity(RULES.len());
        let mut outcome = None;

        for rule in RULES {
            match rule.check(&req, &self.cfg) {
                Some((verdict, reason)) => {
                    trace.push(RuleResult {
                        rule_id: rule.id().to_string(),
                        fired: true,
                        verdict: Some(verdict),
                        reason: reason.clone(),
                    });
                    outcome = Some((rule, verdict, reason));
                    break;
                }
                None => trace.push(RuleResult {
                    rule_id: rule.id().to_string(),
                    fired: false,
                    verdict: None,
                    reason: String::new(),
                }),
            }
        }

        // DefaultAllow always fires
        let (rule, verdict, reason) =
            outcome.unwrap_or((Rule::DefaultAllow, Verdict::Allow, String::new()));

        if verdict == Verdict::Allow {
            debug!(action = %req.action, actor = %req.actor_id, "action allowed");
        } else {
            info!(
                action = %req.action,
                actor = %req.actor_id,
                role = %req.actor_role,
                verdict = %verdict,
                rule = rule.id(),
                "action held by decision control"
            );
        }

        Decision {
            id: Uuid::new_v4(),
            request: req,
            verdict,
            rule_id: rule.id().to_string(),
            reason,
            trace,
            decided_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn engine() -> RulesEngine {
        RulesEngine::new(AdcsConfig::default())
    }

    #[rstest]
    #[case(ActionRequest::new("u1", ActorRole::Anonymous, "post.create"), Verdict::Deny, "anonymous_actor")]
    #[case(ActionRequest::new("u1", ActorRole::Admin, "database.drop"), Verdict::Deny, "blocked_action")]
    #[case(ActionRequest::new("u1", ActorRole::Member, "opportunity.approve"), Verdict::Deny, "role_permission")]
    #[case(ActionRequest::new("u1", ActorRole::Moderator, "opportunity.approve"), Verdict::Allow, "default_allow")]
    #[case(
        ActionRequest::new("u1", ActorRole::Moderator, "opportunity.reject").with_targets(51),
        Verdict::RequireHuman,
        "bulk_threshold"
    )]
    #[case(
        ActionRequest::new("u1", ActorRole::Moderator, "opportunity.reject").with_targets(50),
        Verdict::Allow,
        "default_allow"
    )]
    #[case(
        ActionRequest::new("u1", ActorRole::Admin, "payout.send").with_amount(500.01),
        Verdict::RequireHuman,
        "financial_threshold"
    )]
    #[case(
        ActionRequest::new("u1", ActorRole::Admin, "payout.send").with_amount(500.0),
        Verdict::Allow,
        "default_allow"
    )]
    #[case(
        ActionRequest::new("svc", ActorRole::System, "module.advance").in_environment(Environment::Production),
        Verdict::Allow,
        "default_allow"
    )]
    fn rule_outcomes(#[case] req: ActionRequest, #[case] verdict: Verdict, #[case] rule_id: &str) {
        let decision = engine().evaluate(req);
        assert_eq!(decision.verdict, verdict);
        assert_eq!(decision.rule_id, rule_id);
    }

    #[test]
    fn production_guard_holds_non_admins() {
        let mut cfg = AdcsConfig::default();
        cfg.required_roles.insert("module.advance".to_string(), ActorRole::Moderator);
        let decision = RulesEngine::new(cfg).evaluate(
            ActionRequest::new("m1", ActorRole::Moderator, "module.advance")
                .in_environment(Environment::Production),
        );
        assert_eq!(decision.verdict, Verdict::RequireHuman);
        assert_eq!(decision.rule_id, "production_guard");
    }

    #[test]
    fn earlier_rules_win() {
        // Blocked and over the bulk limit: the block is reported
        let decision = engine()
            .evaluate(ActionRequest::new("u1", ActorRole::Admin, "database.drop").with_targets(1000));
        assert_eq!(decision.rule_id, "blocked_action");
    }

    #[test]
    fn trace_stops_at_first_firing_rule() {
        let decision = engine()
            .evaluate(ActionRequest::new("u1", ActorRole::Member, "opportunity.feature"));
        let ids: Vec<_> = decision.trace.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["anonymous_actor", "blocked_action", "role_permission"]);
        assert!(decision.trace.last().unwrap().fired);
        assert!(decision.trace[..2].iter().all(|r| !r.fired));
    }

    #[test]
    fn unlisted_actions_need_membership() {
        let decision = engine().evaluate(ActionRequest::new("u1", ActorRole::Member, "post.create"));
        assert!(decision.is_allowed());
        assert_eq!(decision.trace.len(), RULES.len());
    }
}
