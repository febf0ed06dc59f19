//! Counting queries over a seller's existing listings.
//!
//! Store failures surface as errors. A count of zero on a failed read would
//! wrongly admit the listing.

use std::sync::Arc;
use std::time::Duration;

use bidgate_common::clock::Clock;
use bidgate_common::error::StoreError;
use bidgate_common::ids::{CategoryId, UserId};
use bidgate_common::listings::{ListingStore, ListingWindow};
use tracing::debug;

use crate::deadline;

#[derive(Clone)]
pub struct OverlapCounter {
    listings: Arc<dyn ListingStore>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl OverlapCounter {
    pub fn new(listings: Arc<dyn ListingStore>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            listings,
            clock,
            timeout,
        }
    }

    /// Listings that have not terminated yet, as of the clock's now.
    pub async fn active_and_future_count(&self, seller: UserId) -> Result<u64, StoreError> {
        let now = self.clock.now();
        let count = deadline::bounded(
            self.timeout,
            self.listings.active_and_future_count_for(seller, now),
        )
        .await?;
        debug!(%seller, %now, count, "active and future listings");
        Ok(count)
    }

    pub async fn overlap_count(&self, seller: UserId, window: ListingWindow) -> Result<u64, StoreError> {
        let count =
            deadline::bounded(self.timeout, self.listings.overlapping_count_for(seller, window)).await?;
        debug!(%seller, count, "overlapping listings");
        Ok(count)
    }

    /// Category membership only, the requested window plays no part.
    pub async fn category_count(&self, seller: UserId, category: CategoryId) -> Result<u64, StoreError> {
        let count =
            deadline::bounded(self.timeout, self.listings.category_count_for(seller, category)).await?;
        debug!(%seller, %category, count, "listings in category");
        Ok(count)
    }

    pub async fn category_window_count(
        &self,
        seller: UserId,
        category: CategoryId,
        window: ListingWindow,
    ) -> Result<u64, StoreError> {
        let count = deadline::bounded(
            self.timeout,
            self.listings
                .category_overlapping_count_for(seller, category, window),
        )
        .await?;
        debug!(%seller, %category, count, "overlapping listings in category");
        Ok(count)
    }
}
