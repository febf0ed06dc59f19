//! Serialization point for listing creation.
//!
//! [`AdmissionController`] answers from a snapshot of the stores; by the time
//! the caller writes, another request from the same seller may have written
//! too. The gate closes that gap by holding a per-seller lock across the
//! admission check and the insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use bidgate_common::error::StoreError;
use bidgate_common::ids::{ListingId, UserId};
use bidgate_common::listings::{ListingWriter, NewListing};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::admission::{AdmissionController, AdmissionError, Decision, DenialReason, ListingRequest};
use crate::deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Listed(ListingId),
    Rejected(DenialReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error("listing could not be saved: {0}")]
    Write(#[source] StoreError),
}

impl GateError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Admission(e) => e.is_retryable(),
            Self::Write(_) => true,
        }
    }
}

pub struct ListingGate {
    controller: Arc<AdmissionController>,
    writer: Arc<dyn ListingWriter>,
    timeout: Duration,
    locks: SellerLocks,
}

type SellerLocks = StdMutex<HashMap<UserId, Arc<Mutex<()>>>>;

/// A seller's entry in the lock table, taken for one submission.
///
/// Dropping the slot removes the entry once no other submission shares it, so
/// the table shrinks back even when the submitting future is cancelled.
struct SellerSlot<'a> {
    locks: &'a SellerLocks,
    seller: UserId,
    lock: Arc<Mutex<()>>,
}

impl Drop for SellerSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the table, one in this slot.
        if locks.get(&self.seller).is_some_and(|l| Arc::strong_count(l) == 2) {
            locks.remove(&self.seller);
        }
    }
}

impl ListingGate {
    pub fn new(controller: Arc<AdmissionController>, writer: Arc<dyn ListingWriter>, timeout: Duration) -> Self {
        Self {
            controller,
            writer,
            timeout,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Checks `request` and, if admitted, persists it before any other request
    /// from the same seller is looked at.
    pub async fn submit(&self, request: ListingRequest) -> Result<GateOutcome, GateError> {
        let slot = self.occupy(request.seller);
        let _held = slot.lock.lock().await;
        self.check_and_insert(&request).await
    }

    async fn check_and_insert(&self, request: &ListingRequest) -> Result<GateOutcome, GateError> {
        match self.controller.can_list(request).await? {
            Decision::Denied(reason) => {
                info!(seller = %request.seller, reason = reason.code(), "listing rejected");
                Ok(GateOutcome::Rejected(reason))
            }
            Decision::Allowed => {
                let new_listing = NewListing {
                    seller: request.seller,
                    category: request.category,
                    window: request.window,
                };
                let id = deadline::bounded(self.timeout, self.writer.insert_listing(new_listing))
                    .await
                    .map_err(|e| {
                        warn!(seller = %request.seller, "admitted listing was not saved: {e}");
                        GateError::Write(e)
                    })?;
                info!(seller = %request.seller, listing = %id, "listing created");
                Ok(GateOutcome::Listed(id))
            }
        }
    }

    fn occupy(&self, seller: UserId) -> SellerSlot<'_> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(seller)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        SellerSlot {
            locks: &self.locks,
            seller,
            lock,
        }
    }

    #[cfg(test)]
    fn tracked_sellers(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
