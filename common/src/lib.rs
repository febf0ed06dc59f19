//! # Bidgate Common
//!
//! Shared vocabulary for the admission engine.
//!
//! * **Models**: identifiers, ratings, listings and their time windows.
//! * **Ports**: the store traits the engine reads through ([`conditions::ConditionStore`],
//!   [`ratings::RatingStore`], [`listings::ListingStore`]) plus the caller-side
//!   [`listings::ListingWriter`] and the [`clock::Clock`].
//!
//! Nothing in here performs IO. Concrete adapters live in `bidgate-core`.

pub mod clock;
pub mod conditions;
pub mod config;
pub mod error;
pub mod ids;
pub mod listings;
pub mod ratings;
