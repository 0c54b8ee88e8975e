use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::RepoError;
use crate::domain::{Opportunity, OpportunityKind, OpportunityStatus};

#[derive(Debug, Clone, Default)]
pub struct OpportunityFilter {
    pub kind: Option<OpportunityKind>,
    pub featured: Option<bool>,
}

#[derive(Default)]
pub struct OpportunityRepository {
    items: RwLock<HashMap<Uuid, Opportunity>>,
}

impl OpportunityRepository {
    pub fn insert(&self, opp: Opportunity) {
        self.items.write().insert(opp.id, opp);
    }

    pub fn find(&self, id: Uuid) -> Option<Opportunity> {
        self.items.read().get(&id).cloned()
    }

    /// Approved listings, featured first, then newest first
    pub fn list_public(&self, filter: &OpportunityFilter) -> Vec<Opportunity> {
        let mut out: Vec<Opportunity> = self
            .items
            .read()
            .values()
            .filter(|o| o.is_public())
            .filter(|o| filter.kind.map_or(true, |k| o.kind == k))
            .filter(|o| filter.featured.map_or(true, |f| o.featured == f))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.featured.cmp(&a.featured).then(b.created_at.cmp(&a.created_at)));
        out
    }

    /// Review queue, oldest first
    pub fn pending(&self) -> Vec<Opportunity> {
        let mut out: Vec<Opportunity> = self
            .items
            .read()
            .values()
            .filter(|o| o.status == OpportunityStatus::Pending)
            .cloned()
            .collect();
        out.sort_by_key(|o| o.created_at);
        out
    }

    pub fn all(&self) -> Vec<Opportunity> {
        self.items.read().values().cloned().collect()
    }

    pub fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Opportunity) -> T,
    ) -> Result<T, RepoError> {
        let mut items = self.items.write();
        let opp = items.get_mut(&id).ok_or_else(|| RepoError::not_found("opportunity", id))?;
        Ok(f(opp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModerationConfig;
    use crate::moderation::Moderator;
    use chrono::{Duration, Utc};

    fn listing(title: &str, kind: OpportunityKind, status: OpportunityStatus, featured: bool, age_hours: i64) -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            title: title.to_string(),
            organization: "Lagos Builders Guild".to_string(),
            kind,
            description: "Paid placement for early career members".to_string(),
            location: None,
            compensation: None,
            currency: "USD".to_string(),
            status,
            featured,
            submitted_by: "member-1".to_string(),
            created_at: Utc::now() - Duration::hours(age_hours),
            moderation: Moderator::new(&ModerationConfig::default()).moderate("placement"),
            reviewed_by: None,
            review_note: None,
        }
    }

    fn seeded() -> OpportunityRepository {
        let repo = OpportunityRepository::default();
        repo.insert(listing("old job", OpportunityKind::Job, OpportunityStatus::Approved, false, 48));
        repo.insert(listing("new job", OpportunityKind::Job, OpportunityStatus::Approved, false, 1));
        repo.insert(listing("old featured grant", OpportunityKind::Grant, OpportunityStatus::Approved, true, 72));
        repo.insert(listing("pending grant", OpportunityKind::Grant, OpportunityStatus::Pending, false, 2));
        repo.insert(listing("rejected job", OpportunityKind::Job, OpportunityStatus::Rejected, true, 3));
        repo
    }

    fn titles(items: &[Opportunity]) -> Vec<&str> {
        items.iter().map(|o| o.title.as_str()).collect()
    }

    #[test]
    fn public_list_is_featured_first_then_newest() {
        let repo = seeded();
        let listed = repo.list_public(&OpportunityFilter::default());
        assert_eq!(titles(&listed), vec!["old featured grant", "new job", "old job"]);
    }

    #[test]
    fn public_list_filters_by_kind_and_featured() {
        let repo = seeded();

        let jobs = repo.list_public(&OpportunityFilter { kind: Some(OpportunityKind::Job), featured: None });
        assert_eq!(titles(&jobs), vec!["new job", "old job"]);

        let featured = repo.list_public(&OpportunityFilter { kind: None, featured: Some(true) });
        assert_eq!(titles(&featured), vec!["old featured grant"]);

        let none = repo.list_public(&OpportunityFilter { kind: Some(OpportunityKind::Event), featured: None });
        assert!(none.is_empty());
    }

    #[test]
    fn pending_queue_is_oldest_first() {
        let repo = seeded();
        repo.insert(listing("older pending", OpportunityKind::Event, OpportunityStatus::Pending, false, 10));
        assert_eq!(titles(&repo.pending()), vec!["older pending", "pending grant"]);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let repo = seeded();
        let id = Uuid::new_v4();
        assert_eq!(repo.update(id, |_| ()), Err(RepoError::not_found("opportunity", id)));
    }
}
