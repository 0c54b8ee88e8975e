use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::moderation::ModerationOutcome;

/// A member post on the social feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub author_id: String,
    pub body: String,
    pub moderation: ModerationOutcome,
    /// Flagged posts are kept for review but not shown
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}
