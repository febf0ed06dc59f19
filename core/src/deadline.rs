use std::future::Future;
use std::time::Duration;

use bidgate_common::error::StoreError;

/// Runs a store read, turning an elapsed `limit` into [`StoreError::Timeout`].
pub(crate) async fn bounded<T, F>(limit: Duration, read: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, read).await {
        Ok(res) => res,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
