use crate::error::{Error, Result};
use crate::pipeline::retry::RetryPolicy;
use crate::record::PageRecord;
use crate::store::RecordStore;

/// Writes page batches to a store, backing off while the store is throttled.
pub struct BatchWriter<S> {
    store: S,
    retry_policy: RetryPolicy,
}

impl<S: RecordStore> BatchWriter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            retry_policy: RetryPolicy::throughput(),
        }
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Send `rows` as one bulk put.
    ///
    /// Retryable (by default: throttled) failures sleep for the policy's
    /// backoff and try again until `max_attempts` is spent, then fail with
    /// [`Error::RetryExhausted`]. Any other failure is returned as
    /// [`Error::Store`] without retrying. An empty batch never reaches the
    /// store.
    pub async fn write_batch(&self, rows: &[PageRecord]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let table = self.store.name();
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 1u32;

        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::INFO,
            event = "pagesync.batch.write",
            table = table,
            rows = rows.len(),
            "starting write of {} items to {}",
            rows.len(),
            table
        );

        loop {
            let error = match self.store.put_batch(rows).await {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::event!(
                        tracing::Level::INFO,
                        event = "pagesync.batch.written",
                        table = table,
                        attempts = attempt,
                        "completed writing to {}",
                        table
                    );
                    return Ok(());
                }
                Err(error) => error,
            };

            let retryable = self.retry_policy.is_retryable(&error);

            #[cfg(feature = "tracing")]
            tracing::event!(
                tracing::Level::WARN,
                event = "pagesync.retry.attempt_failed",
                table = table,
                attempt = attempt,
                max_attempts = max_attempts,
                retryable = retryable,
                error = %error,
                "pagesync.retry.attempt_failed"
            );

            if !retryable {
                return Err(Error::Store(error));
            }

            if attempt >= max_attempts {
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::ERROR,
                    event = "pagesync.retry.exhausted",
                    table = table,
                    attempts = max_attempts,
                    error = %error,
                    "pagesync.retry.exhausted"
                );
                return Err(Error::retry_exhausted(table, max_attempts, error));
            }

            let delay = self.retry_policy.backoff_delay(attempt);
            if !delay.is_zero() {
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::WARN,
                    event = "pagesync.retry.sleep",
                    table = table,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "throughput exceeded, retry {} in {:?}",
                    attempt,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            attempt += 1;
        }
    }
}
