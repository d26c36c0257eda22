//! Retry logic utilities for RPC operations
//!
//! This module provides helper functions for implementing exponential backoff
//! retry logic and timeout wrappers for RPC client operations.

use crate::errors::{RpcError, RpcResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use rollup_compression_research::rpc::calculate_next_backoff;
///
/// let backoff = Duration::from_millis(100);
/// let next = calculate_next_backoff(backoff, 2.0, 30);
/// assert_eq!(next, Duration::from_millis(200));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

/// Run an RPC future with a timeout, mapping expiry to [`RpcError::Timeout`]
pub async fn execute_with_timeout<T, F>(
    timeout_seconds: u64,
    operation: &str,
    future: F,
) -> RpcResult<T>
where
    F: Future<Output = RpcResult<T>>,
{
    match timeout(Duration::from_secs(timeout_seconds), future).await {
        Ok(result) => result,
        Err(_) => Err(RpcError::Timeout {
            timeout_seconds,
            operation: operation.to_string(),
        }),
    }
}
