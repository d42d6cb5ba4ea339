use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::MarketDataError;

/// Classification for retry policy.
///
/// With a single upstream provider there are only two useful responses to a
/// failed request: give up for this cycle, or retry the same request after a
/// short backoff.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, validation error, or terminal failure.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry the same request with exponential backoff.
    ///
    /// Used for transient errors like rate limiting (429) or timeout.
    WithBackoff,
}

/// Base delay for the first backoff retry; doubles on each attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Runs `op`, retrying up to `max_attempts` times when the returned error is
/// classified [`RetryClass::WithBackoff`].
///
/// Terminal errors are returned immediately. When attempts are exhausted the
/// last error is returned; callers decide whether that degrades the cycle or
/// fails the request.
pub async fn with_backoff<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.retry_class() == RetryClass::WithBackoff && attempt < max_attempts => {
                let delay = INITIAL_BACKOFF * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "transient market data error (attempt {}/{}), retrying in {:?}: {}",
                    attempt, max_attempts, delay, e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn timeout() -> MarketDataError {
        MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, MarketDataError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(timeout())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_backoff(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(MarketDataError::SymbolNotFound("INVALID".to_string())) }
        })
        .await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_backoff(2, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(timeout()) }
        })
        .await;
        assert!(matches!(result, Err(MarketDataError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
