//! Deadline wrapper for storage and cache calls.

use crate::{UsergateError, UsergateResult};
use std::future::Future;
use std::time::Duration;

/// Default deadline for a single storage or cache round trip.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs `fut` with a deadline.
///
/// An elapsed deadline surfaces as [`UsergateError::Timeout`] naming the
/// operation. Dropping the returned future drops `fut`, which cancels the
/// in-flight call.
pub async fn with_timeout<T, Fut>(
    duration: Duration,
    operation: &'static str,
    fut: Fut,
) -> UsergateResult<T>
where
    Fut: Future<Output = UsergateResult<T>>,
{
    tokio::time::timeout(duration, fut).await.map_err(|_| {
        UsergateError::Timeout(format!("{operation} exceeded {}ms", duration.as_millis()))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), "answer", async {
            Ok::<_, UsergateError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), "slow_call", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, UsergateError>(42)
        })
        .await;

        match result {
            Err(UsergateError::Timeout(msg)) => assert!(msg.contains("slow_call")),
            other => panic!("Expected Timeout error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: UsergateResult<()> = with_timeout(Duration::from_secs(1), "failing", async {
            Err(UsergateError::conflict("dup"))
        })
        .await;
        assert!(matches!(result, Err(UsergateError::Conflict(_))));
    }
}
