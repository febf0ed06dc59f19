//! # In-Memory Adapters
//!
//! Implementations of every store port backed by plain collections. Used by the
//! test suites and by the CLI when replaying a snapshot.
//!
//! No persistence, no indexing: counts are linear scans. [`Unreachable`] stands
//! in for a backend that is down.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bidgate_common::conditions::{ConditionName, ConditionStore};
use bidgate_common::error::StoreError;
use bidgate_common::ids::{CategoryId, ListingId, UserId};
use bidgate_common::listings::{Listing, ListingStore, ListingWindow, ListingWriter, NewListing};
use bidgate_common::ratings::{Rating, RatingStore};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryConditionStore {
    values: Arc<RwLock<HashMap<String, i64>>>,
}

impl MemoryConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ConditionName, i64)>,
    {
        let values = pairs
            .into_iter()
            .map(|(name, value)| (name.as_str().to_string(), value))
            .collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    pub async fn set(&self, name: &str, value: i64) {
        self.values.write().await.insert(name.to_string(), value);
    }
}

#[async_trait]
impl ConditionStore for MemoryConditionStore {
    async fn get(&self, name: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.values.read().await.get(name).copied())
    }
}

#[derive(Clone, Default)]
pub struct MemoryRatingStore {
    ratings: Arc<RwLock<Vec<Rating>>>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ratings(ratings: Vec<Rating>) -> Self {
        Self {
            ratings: Arc::new(RwLock::new(ratings)),
        }
    }

    pub async fn add(&self, rating: Rating) {
        self.ratings.write().await.push(rating);
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    async fn recent_ratings_for(&self, user: UserId, limit: usize) -> Result<Vec<Rating>, StoreError> {
        let ratings = self.ratings.read().await;
        let mut recent: Vec<Rating> = ratings
            .iter()
            .filter(|r| r.rated_user == user)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        recent.truncate(limit);
        Ok(recent)
    }
}

/// Listing table that also accepts writes, so the same instance can back both
/// the engine and a [`crate::gate::ListingGate`].
#[derive(Clone, Default)]
pub struct MemoryListingStore {
    listings: Arc<RwLock<Vec<Listing>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let next_id = listings.iter().map(|l| l.id.0).max().map_or(0, |id| id + 1);
        Self {
            listings: Arc::new(RwLock::new(listings)),
            next_id: Arc::new(AtomicU64::new(next_id)),
        }
    }

    /// Stores `listing` as-is, keeping its id.
    pub async fn push(&self, listing: Listing) {
        self.next_id.fetch_max(listing.id.0 + 1, Ordering::Relaxed);
        self.listings.write().await.push(listing);
    }

    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }

    async fn count_where<F>(&self, seller: UserId, pred: F) -> u64
    where
        F: Fn(&Listing) -> bool,
    {
        self.listings
            .read()
            .await
            .iter()
            .filter(|l| l.seller == seller && pred(l))
            .count() as u64
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn active_and_future_count_for(
        &self,
        seller: UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        Ok(self.count_where(seller, |l| l.is_active_or_future(now)).await)
    }

    async fn overlapping_count_for(
        &self,
        seller: UserId,
        window: ListingWindow,
    ) -> Result<u64, StoreError> {
        Ok(self.count_where(seller, |l| window.overlaps(&l.window())).await)
    }

    async fn category_count_for(
        &self,
        seller: UserId,
        category: CategoryId,
    ) -> Result<u64, StoreError> {
        Ok(self.count_where(seller, |l| l.category == category).await)
    }

    async fn category_overlapping_count_for(
        &self,
        seller: UserId,
        category: CategoryId,
        window: ListingWindow,
    ) -> Result<u64, StoreError> {
        Ok(self
            .count_where(seller, |l| l.category == category && window.overlaps(&l.window()))
            .await)
    }
}

#[async_trait]
impl ListingWriter for MemoryListingStore {
    async fn insert_listing(&self, listing: NewListing) -> Result<ListingId, StoreError> {
        let id = ListingId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listings.write().await.push(Listing {
            id,
            seller: listing.seller,
            category: listing.category,
            start_date: listing.window.start,
            termination_date: listing.window.end,
        });
        Ok(id)
    }
}

/// Every read fails as if the backend were down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unreachable;

fn down<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("backend unreachable".to_string()))
}

#[async_trait]
impl ConditionStore for Unreachable {
    async fn get(&self, _name: &str) -> Result<Option<i64>, StoreError> {
        down()
    }
}

#[async_trait]
impl RatingStore for Unreachable {
    async fn recent_ratings_for(&self, _user: UserId, _limit: usize) -> Result<Vec<Rating>, StoreError> {
        down()
    }
}

#[async_trait]
impl ListingStore for Unreachable {
    async fn active_and_future_count_for(&self, _: UserId, _: DateTime<Utc>) -> Result<u64, StoreError> {
        down()
    }

    async fn overlapping_count_for(&self, _: UserId, _: ListingWindow) -> Result<u64, StoreError> {
        down()
    }

    async fn category_count_for(&self, _: UserId, _: CategoryId) -> Result<u64, StoreError> {
        down()
    }

    async fn category_overlapping_count_for(
        &self,
        _: UserId,
        _: CategoryId,
        _: ListingWindow,
    ) -> Result<u64, StoreError> {
        down()
    }
}

#[async_trait]
impl ListingWriter for Unreachable {
    async fn insert_listing(&self, _listing: NewListing) -> Result<ListingId, StoreError> {
        down()
    }
}
