use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreError;

type RetryPredicate = Arc<dyn Fn(&StoreError) -> bool + Send + Sync>;

/// Attempts made for one batch before giving up on a throttled store.
pub const THROUGHPUT_MAX_ATTEMPTS: u32 = 20;

/// Wait before the second attempt; doubled after every throttled attempt.
pub const THROUGHPUT_BASE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Option<Duration>,
    retry_if: RetryPredicate,
}

impl RetryPolicy {
    /// A policy allowing `max_attempts` attempts in total, retrying only
    /// throttled responses.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: THROUGHPUT_BASE_DELAY,
            max_delay: None,
            retry_if: Arc::new(StoreError::is_throttled),
        }
    }

    /// 20 attempts, 1.5s first backoff, doubling without a ceiling.
    pub fn throughput() -> Self {
        Self::new(THROUGHPUT_MAX_ATTEMPTS)
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn retry_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&StoreError) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Arc::new(predicate);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_retryable(&self, error: &StoreError) -> bool {
        (self.retry_if)(error)
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1);
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(exp));
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::throughput()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish_non_exhaustive()
    }
}
