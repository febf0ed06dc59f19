use std::sync::Arc;

use bidgate_common::clock::FixedClock;
use bidgate_common::conditions::ConditionName;
use bidgate_common::config::EngineConfig;
use bidgate_common::ids::{CategoryId, ListingId, RatingId, UserId};
use bidgate_common::listings::{Listing, ListingWindow};
use bidgate_common::ratings::Rating;
use bidgate_core::admission::{AdmissionController, ListingRequest};
use bidgate_core::memory::{MemoryConditionStore, MemoryListingStore, MemoryRatingStore};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const SELLER: UserId = UserId(100);
pub const OTHER_SELLER: UserId = UserId(200);
pub const ELECTRONICS: CategoryId = CategoryId(1);
pub const GARDEN: CategoryId = CategoryId(2);

/// Day `n` of the test calendar, midnight UTC.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// Everything a scenario needs: the stores, kept around so tests can mutate
/// them between checks, plus a controller reading them.
pub struct World {
    pub conditions: MemoryConditionStore,
    pub ratings: MemoryRatingStore,
    pub listings: MemoryListingStore,
    pub controller: Arc<AdmissionController>,
    next_rating: u64,
    next_listing: u64,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Clock is pinned at day 0.
    pub fn with_config(config: EngineConfig) -> Self {
        let conditions = MemoryConditionStore::new();
        let ratings = MemoryRatingStore::new();
        let listings = MemoryListingStore::new();
        let controller = AdmissionController::new(
            Arc::new(conditions.clone()),
            Arc::new(ratings.clone()),
            Arc::new(listings.clone()),
            Arc::new(FixedClock(day(0))),
            &config,
        );
        Self {
            conditions,
            ratings,
            listings,
            controller: Arc::new(controller),
            next_rating: 0,
            next_listing: 0,
        }
    }

    pub async fn set(&self, name: ConditionName, value: i64) {
        self.conditions.set(name.as_str(), value).await;
    }

    /// Adds grades oldest first. Every rating is newer than all earlier ones,
    /// and all of them predate day 0.
    pub async fn rate(&mut self, user: UserId, grades: &[i64]) {
        for grade in grades {
            self.next_rating += 1;
            let at = day(-365) + Duration::hours(self.next_rating as i64);
            self.ratings
                .add(Rating::new(RatingId(self.next_rating), user, *grade, at))
                .await;
        }
    }

    pub async fn list(&mut self, seller: UserId, category: CategoryId, start: i64, end: i64) {
        self.next_listing += 1;
        let listing = Listing {
            id: ListingId(self.next_listing),
            seller,
            category,
            start_date: day(start),
            termination_date: day(end),
        };
        self.listings.push(listing).await;
    }
}

pub fn request(category: CategoryId, start: i64, end: i64) -> ListingRequest {
    ListingRequest {
        seller: SELLER,
        category,
        window: ListingWindow::new(day(start), day(end)),
    }
}
