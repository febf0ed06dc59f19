//! JSON snapshot of the three stores, replayed into the in-memory adapters.
//!
//! ```json
//! {
//!   "now": "2026-05-01T00:00:00Z",
//!   "conditions": { "K": 10, "T": "25" },
//!   "ratings": [{ "id": 1, "rated_user": 7, "grade": 8, "timestamp": "2026-04-02T10:00:00Z" }],
//!   "listings": [{ "id": 1, "seller": 7, "category": 3,
//!                  "start_date": "2026-04-28T00:00:00Z", "termination_date": "2026-05-04T00:00:00Z" }]
//! }
//! ```
//!
//! Every section is optional. Without `now` the wall clock is used.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bidgate_common::clock::{Clock, FixedClock, SystemClock};
use bidgate_common::conditions::ConditionName;
use bidgate_common::config::EngineConfig;
use bidgate_common::listings::Listing;
use bidgate_common::ratings::Rating;
use bidgate_core::admission::AdmissionController;
use bidgate_core::conditions::ConditionReader;
use bidgate_core::memory::{MemoryConditionStore, MemoryListingStore, MemoryRatingStore};
use bidgate_core::reputation::MIN_GRADE;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub conditions: BTreeMap<String, Value>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

impl Snapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("malformed snapshot {}", path.display()))?;
        debug!(
            conditions = snapshot.conditions.len(),
            ratings = snapshot.ratings.len(),
            listings = snapshot.listings.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub async fn into_controller(self, cfg: &EngineConfig) -> AdmissionController {
        let conditions = MemoryConditionStore::new();
        for (name, value) in &self.conditions {
            if name.parse::<ConditionName>().is_err() {
                warn!("snapshot sets unknown condition {name}, the engine will not read it");
            }
            match parse_condition(value) {
                Some(v) => conditions.set(name, v).await,
                None => warn!("condition {name} is not an integer ({value}), treating it as absent"),
            }
        }

        let max_grade = ConditionReader::new(Arc::new(conditions.clone()), cfg.store_timeout)
            .value(ConditionName::S)
            .await;
        for rating in out_of_scale(&self.ratings, max_grade) {
            warn!(
                "rating {} for user {} has grade {} outside {MIN_GRADE}..={max_grade}, it will be clamped",
                rating.id, rating.rated_user, rating.grade
            );
        }

        let clock: Arc<dyn Clock> = match self.now {
            Some(now) => Arc::new(FixedClock(now)),
            None => Arc::new(SystemClock),
        };

        AdmissionController::new(
            Arc::new(conditions),
            Arc::new(MemoryRatingStore::from_ratings(self.ratings)),
            Arc::new(MemoryListingStore::from_listings(self.listings)),
            clock,
            cfg,
        )
    }
}

/// Integers, or strings holding one. Anything else is unparsable.
fn parse_condition(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Ratings whose grade falls outside `MIN_GRADE..=max_grade`.
fn out_of_scale(ratings: &[Rating], max_grade: i64) -> impl Iterator<Item = &Rating> {
    let top = max_grade.max(MIN_GRADE);
    ratings
        .iter()
        .filter(move |r| !(MIN_GRADE..=top).contains(&r.grade))
}
