//! Retry/backoff for idempotent background operations (§7 "Retry/backoff
//! for idempotent background operations lives in cortex-decay/
//! cortex-consolidation schedulers"). Exponential, starting at the
//! supplied base delay, doubling each attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Runs `op` up to `max_retries + 1` times, sleeping `base_backoff * 2^n`
/// between attempts. Returns the last error if every attempt fails.
pub async fn with_backoff<T, E, F, Fut>(
    max_retries: u32,
    base_backoff: Duration,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries => {
                let delay = base_backoff * 2u32.pow(attempt);
                warn!(%label, attempt, error = %e, delay_ms = delay.as_millis(), "operation failed; retrying");
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

    #[tokio::test]
    async fn retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32, &str> = with_backoff(3, Duration::from_millis(1), "test", || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("not yet")
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32, &str> = with_backoff(2, Duration::from_millis(1), "test", || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("always fails")
        })
        .await;

        assert_eq!(result, Err("always fails"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
