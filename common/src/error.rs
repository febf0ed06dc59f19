use std::time::Duration;

use thiserror::Error;

/// Failure reported by any store port.
///
/// Both variants are transient from the engine's point of view: the data might
/// be there, it just could not be read in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store read timed out after {0:?}")]
    Timeout(Duration),
}
