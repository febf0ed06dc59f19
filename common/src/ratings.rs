use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::{RatingId, UserId};

/// A grade left after a completed transaction. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub rated_user: UserId,
    /// In `1..=S`.
    pub grade: i64,
    pub timestamp: DateTime<Utc>,
}

impl Rating {
    pub fn new(id: RatingId, rated_user: UserId, grade: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            rated_user,
            grade,
            timestamp,
        }
    }
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// The `limit` most recent ratings of `user`, newest first.
    ///
    /// Ratings sharing a timestamp must come back in the same order on every
    /// call (higher [`RatingId`] first).
    async fn recent_ratings_for(&self, user: UserId, limit: usize) -> Result<Vec<Rating>, StoreError>;
}
