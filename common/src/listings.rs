//! # Listings
//!
//! Auctions a seller has put up, and the closed time windows they occupy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::{CategoryId, ListingId, UserId};

/// A closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ListingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A window ending before it starts cannot be listed.
    pub fn is_valid(&self) -> bool {
        self.end >= self.start
    }

    /// Inclusive on both ends: windows touching at a single instant overlap.
    pub fn overlaps(&self, other: &ListingWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller: UserId,
    pub category: CategoryId,
    pub start_date: DateTime<Utc>,
    /// Effective end. Starts out as the scheduled end date and moves earlier
    /// if the auction is closed early.
    pub termination_date: DateTime<Utc>,
}

impl Listing {
    pub fn window(&self) -> ListingWindow {
        ListingWindow::new(self.start_date, self.termination_date)
    }

    /// Still running, or not started yet.
    pub fn is_active_or_future(&self, now: DateTime<Utc>) -> bool {
        self.termination_date > now
    }
}

/// A listing request that passed admission and is about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub seller: UserId,
    pub category: CategoryId,
    pub window: ListingWindow,
}

/// Read-only counting queries over a seller's listings.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Listings of `seller` whose termination date is after `now`.
    async fn active_and_future_count_for(
        &self,
        seller: UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Listings of `seller` whose window overlaps `window` (inclusive).
    async fn overlapping_count_for(
        &self,
        seller: UserId,
        window: ListingWindow,
    ) -> Result<u64, StoreError>;

    /// Listings of `seller` in `category`, regardless of dates.
    async fn category_count_for(
        &self,
        seller: UserId,
        category: CategoryId,
    ) -> Result<u64, StoreError>;

    /// Listings of `seller` in `category` whose window overlaps `window`.
    async fn category_overlapping_count_for(
        &self,
        seller: UserId,
        category: CategoryId,
        window: ListingWindow,
    ) -> Result<u64, StoreError>;
}

/// Persists admitted listings. Owned by the listing-creation workflow, not the engine.
#[async_trait]
pub trait ListingWriter: Send + Sync {
    async fn insert_listing(&self, listing: NewListing) -> Result<ListingId, StoreError>;
}
