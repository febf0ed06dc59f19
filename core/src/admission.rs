//! # Admission Control
//!
//! Decides whether a seller may put up one more listing. Checks run in a fixed
//! order and stop at the first failure:
//!
//! 1. The requested window must not end before it starts.
//! 2. Active and future listings must stay below `K`.
//! 3. Listings overlapping the window must stay below the seller's quota.
//! 4. Listings in the category must stay below `M`.
//!
//! The controller only reads. Two requests from one seller evaluated at the same
//! time can both pass and together overshoot the caps; whoever persists the
//! listing has to serialize per seller (see [`crate::gate::ListingGate`]).

use std::fmt;
use std::sync::Arc;

use bidgate_common::clock::Clock;
use bidgate_common::conditions::ConditionStore;
use bidgate_common::config::{CategoryScope, EngineConfig};
use bidgate_common::error::StoreError;
use bidgate_common::ids::{CategoryId, UserId};
use bidgate_common::listings::{ListingStore, ListingWindow};
use bidgate_common::ratings::RatingStore;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::conditions::{ConditionReader, Thresholds};
use crate::overlap::OverlapCounter;
use crate::quota::QuotaMapper;
use crate::reputation::{ReputationScorer, TrustScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingRequest {
    pub seller: UserId,
    pub category: CategoryId,
    pub window: ListingWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    InvalidWindow,
    TooManyActiveListings,
    QuotaExceeded,
    CategoryLimitExceeded,
}

impl DenialReason {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidWindow => "InvalidWindow",
            Self::TooManyActiveListings => "TooManyActiveListings",
            Self::QuotaExceeded => "QuotaExceeded",
            Self::CategoryLimitExceeded => "CategoryLimitExceeded",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidWindow => "the listing would end before it starts",
            Self::TooManyActiveListings => {
                "the seller already has the maximum number of running and scheduled listings"
            }
            Self::QuotaExceeded => {
                "the seller's rating does not allow another listing during this period"
            }
            Self::CategoryLimitExceeded => {
                "the seller already has the maximum number of listings in this category"
            }
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}

/// Which store a transient failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Ratings,
    Listings,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratings => f.write_str("rating"),
            Self::Listings => f.write_str("listing"),
        }
    }
}

/// No decision could be made. Never means "denied"; callers should retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("{store} store unavailable, try again later")]
    TransientFailure {
        store: StoreKind,
        #[source]
        source: StoreError,
    },
}

impl AdmissionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure { .. })
    }

    fn ratings(source: StoreError) -> Self {
        Self::TransientFailure {
            store: StoreKind::Ratings,
            source,
        }
    }

    fn listings(source: StoreError) -> Self {
        Self::TransientFailure {
            store: StoreKind::Listings,
            source,
        }
    }
}

/// A decision together with every figure that went into it.
///
/// Figures belonging to checks after the first denial are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionReport {
    pub request: ListingRequest,
    pub decision: Decision,
    pub max_active: Option<i64>,
    pub max_per_category: Option<i64>,
    pub category_scope: CategoryScope,
    pub active_and_future: Option<u64>,
    pub overlapping: Option<u64>,
    pub trust_score: Option<TrustScore>,
    pub quota: Option<u64>,
    pub in_category: Option<u64>,
}

impl AdmissionReport {
    fn new(request: ListingRequest, category_scope: CategoryScope) -> Self {
        Self {
            request,
            decision: Decision::Allowed,
            max_active: None,
            max_per_category: None,
            category_scope,
            active_and_future: None,
            overlapping: None,
            trust_score: None,
            quota: None,
            in_category: None,
        }
    }

    fn deny(mut self, reason: DenialReason) -> Self {
        self.decision = Decision::Denied(reason);
        self
    }
}

/// `count >= cap`, where any negative cap is already exceeded.
fn at_cap(count: u64, cap: i64) -> bool {
    i128::from(count) >= i128::from(cap)
}

pub struct AdmissionController {
    conditions: ConditionReader,
    scorer: ReputationScorer,
    quota: QuotaMapper,
    counter: OverlapCounter,
    category_scope: CategoryScope,
}

impl AdmissionController {
    pub fn new(
        conditions: Arc<dyn ConditionStore>,
        ratings: Arc<dyn RatingStore>,
        listings: Arc<dyn ListingStore>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        let conditions = ConditionReader::new(conditions, config.store_timeout);
        Self {
            scorer: ReputationScorer::new(conditions.clone(), ratings, config.store_timeout),
            quota: QuotaMapper::new(conditions.clone()),
            counter: OverlapCounter::new(listings, clock, config.store_timeout),
            conditions,
            category_scope: config.category_scope,
        }
    }

    pub fn conditions(&self) -> &ConditionReader {
        &self.conditions
    }

    pub fn scorer(&self) -> &ReputationScorer {
        &self.scorer
    }

    pub fn quota_mapper(&self) -> &QuotaMapper {
        &self.quota
    }

    pub async fn can_list(&self, request: &ListingRequest) -> Result<Decision, AdmissionError> {
        Ok(self.evaluate(request).await?.decision)
    }

    #[instrument(skip_all, fields(seller = %request.seller, category = %request.category))]
    pub async fn evaluate(&self, request: &ListingRequest) -> Result<AdmissionReport, AdmissionError> {
        let mut report = AdmissionReport::new(*request, self.category_scope);
        let seller = request.seller;

        if !request.window.is_valid() {
            debug!("rejected window ending before its start");
            return Ok(report.deny(DenialReason::InvalidWindow));
        }

        let thresholds = self.conditions.thresholds().await;
        let Thresholds {
            max_active,
            max_per_category,
            ..
        } = thresholds;
        report.max_active = Some(max_active);
        report.max_per_category = Some(max_per_category);

        let active = self
            .counter
            .active_and_future_count(seller)
            .await
            .map_err(AdmissionError::listings)?;
        report.active_and_future = Some(active);
        if at_cap(active, max_active) {
            debug!(active, max_active, "active listing cap reached");
            return Ok(report.deny(DenialReason::TooManyActiveListings));
        }

        let overlapping = self
            .counter
            .overlap_count(seller, request.window)
            .await
            .map_err(AdmissionError::listings)?;
        let score = self
            .scorer
            .score_with(seller, &thresholds)
            .await
            .map_err(AdmissionError::ratings)?;
        let quota = self.quota.quota_with(score, &thresholds);
        report.overlapping = Some(overlapping);
        report.trust_score = Some(score);
        report.quota = Some(quota);
        if overlapping >= quota {
            debug!(overlapping, quota, %score, "quota exhausted");
            return Ok(report.deny(DenialReason::QuotaExceeded));
        }

        let in_category = match self.category_scope {
            CategoryScope::Category => self.counter.category_count(seller, request.category).await,
            CategoryScope::CategoryWindow => {
                self.counter
                    .category_window_count(seller, request.category, request.window)
                    .await
            }
        }
        .map_err(AdmissionError::listings)?;
        report.in_category = Some(in_category);
        if at_cap(in_category, max_per_category) {
            debug!(in_category, max_per_category, "category cap reached");
            return Ok(report.deny(DenialReason::CategoryLimitExceeded));
        }

        debug!("admitted");
        Ok(report)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
