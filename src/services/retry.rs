use std::{future::Future, time::Duration};

use crate::errors::{AppError, AppResult};

/// Which failures are worth another attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryOn {
    /// Store errors such as a dropped connection.
    Transient,
    /// A conditional write that lost a race.
    Conflict,
}

impl RetryOn {
    fn accepts(self, err: &AppError) -> bool {
        match self {
            RetryOn::Transient => err.is_transient(),
            RetryOn::Conflict => err.is_conflict(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub retry_on: RetryOn,
}

impl RetryPolicy {
    /// Fixed-delay policy for store calls that may fail transiently, e.g.
    /// linking an uploaded asset to its sub-bab.
    pub fn transient(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            retry_on: RetryOn::Transient,
        }
    }

    pub fn asset_linking() -> Self {
        Self::transient(3, Duration::from_millis(500))
    }

    /// Re-runs a read-modify-write immediately when another writer got there
    /// first.
    pub fn on_conflict(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
            retry_on: RetryOn::Conflict,
        }
    }
}

/// Runs `operation` until it succeeds, fails with an error the policy does
/// not retry, or the attempts run out. The last error is returned as is.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, label: &str, mut operation: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && policy.retry_on.accepts(&err) => {
                log::debug!(
                    "{} failed on attempt {}/{}: {}",
                    label,
                    attempt,
                    policy.max_attempts,
                    err
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(err) => {
                if attempt > 1 {
                    log::warn!("{} gave up after {} attempts: {}", label, attempt, err);
                }
                return Err(err);
            }
        }
    }
}
