//! # Bidgate Core
//!
//! The reputation-driven admission engine. Decides whether a seller may put up
//! another listing, given their recent ratings and what they already have live.
//!
//! ## Components (leaves first)
//! * [`conditions::ConditionReader`]: thresholds with hard-coded fallbacks.
//! * [`reputation::ReputationScorer`]: trust score from the newest ratings.
//! * [`quota::QuotaMapper`]: trust score to listing quota.
//! * [`overlap::OverlapCounter`]: counts of the seller's existing listings.
//! * [`admission::AdmissionController`]: combines the above into a [`admission::Decision`].
//!
//! The engine never writes. Callers persisting admitted listings must serialize
//! per seller; [`gate::ListingGate`] does that for them.
//!
//! Store adapters for tests and offline tooling are in [`memory`].

pub mod admission;
pub mod conditions;
pub mod gate;
pub mod memory;
pub mod overlap;
pub mod quota;
pub mod reputation;

mod deadline;
