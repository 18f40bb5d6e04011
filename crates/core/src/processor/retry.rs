//! Bounded retry of a fallible async operation.

use std::fmt::Display;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::warn;

use super::config::{FaultClassification, RetryConfig};

/// Final result of a retried operation and how many attempts it took.
#[derive(Debug)]
pub struct Retried<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Runs `op` until it succeeds, the attempt budget is spent, or (under the
/// discriminating classification) `is_transient` rejects an error.
///
/// `op` receives the 1-based attempt number. Each failed attempt is logged.
pub async fn retry_with<T, E, F, Fut, P>(
    config: &RetryConfig,
    is_transient: P,
    mut op: F,
) -> Retried<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                return Retried {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) => {
                let permanent = config.classification == FaultClassification::Discriminating
                    && !is_transient(&e);

                if permanent || attempt >= max_attempts {
                    warn!(
                        attempt,
                        max_attempts,
                        permanent,
                        error = %e,
                        "Attempt failed; giving up"
                    );
                    return Retried {
                        result: Err(e),
                        attempts: attempt,
                    };
                }

                warn!(attempt, max_attempts, error = %e, "Attempt failed; retrying");
                let delay = config.delay_ms(attempt);
                if delay > 0 {
                    sleep(Duration::from_millis(delay)).await;
                }
                attempt += 1;
            }
        }
    }
}
