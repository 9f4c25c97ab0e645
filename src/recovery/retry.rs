//! Classified retry with exponential backoff

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::classifier::{classify, should_retry};
use super::types::RetryError;
use crate::config::RetrySettings;
use crate::error::DefenseError;

/// Observer invoked before each retry attempt
///
/// `attempt` is 1-based and names the retry about to run; `delay` is the
/// backoff just slept. Observers replace ad-hoc progress callbacks, so
/// callers never share mutable counters with the retry loop.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, attempt: u32, delay: Duration, error: &DefenseError);
}

/// Retry engine driven by classification
///
/// Only retry-eligible categories are retried; everything else propagates
/// after a single invocation.
pub struct RetryPolicy {
    settings: RetrySettings,
    observers: Vec<Arc<dyn RetryObserver>>,
}

impl RetryPolicy {
    /// Build a policy with no observers
    pub fn new(settings: RetrySettings) -> Self {
        Self {
            settings,
            observers: Vec::new(),
        }
    }

    /// Register an observer, keeping registration order
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The settings this policy runs on
    pub fn settings(&self) -> &RetrySettings {
        &self.settings
    }

    /// Backoff before retry number `retries_spent + 1`, capped and jittered
    fn delay_for(&self, retries_spent: u32) -> Duration {
        let exponential = self.settings.base_delay_ms as f64
            * self.settings.backoff_multiplier.powi(retries_spent as i32);
        let capped = exponential.min(self.settings.max_delay_ms as f64);

        let delayed = if self.settings.jitter {
            let jitter_factor = 0.1;
            capped + capped * jitter_factor * (rand::random::<f64>() - 0.5)
        } else {
            capped
        };

        Duration::from_millis(delayed.max(0.0) as u64)
    }

    /// Run `op`, retrying eligible failures up to `max_retries` times
    ///
    /// A non-retryable first failure comes back as [`RetryError::Rejected`]
    /// with the original error intact and `op` invoked exactly once. When the
    /// budget runs out the last error is wrapped in
    /// [`RetryError::Exhausted`].
    pub async fn run<F, Fut, T>(&self, mut op: F) -> std::result::Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = crate::error::Result<T>>,
    {
        let mut retries_spent: u32 = 0;

        loop {
            match op().await {
                Ok(value) => {
                    if retries_spent > 0 {
                        debug!(retries = retries_spent, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let category = classify(&err);
                    if !should_retry(category) {
                        debug!(%category, %err, "failure is not retry-eligible");
                        return Err(RetryError::Rejected(err));
                    }
                    if retries_spent >= self.settings.max_retries {
                        error!(
                            attempts = retries_spent + 1,
                            %category,
                            %err,
                            "retry budget exhausted"
                        );
                        return Err(RetryError::Exhausted {
                            attempts: retries_spent + 1,
                            last: err,
                        });
                    }

                    let delay = self.delay_for(retries_spent);
                    warn!(
                        attempt = retries_spent + 1,
                        ?delay,
                        %category,
                        %err,
                        "retrying after failure"
                    );
                    tokio::time::sleep(delay).await;
                    for observer in &self.observers {
                        observer.on_retry(retries_spent + 1, delay, &err);
                    }
                    retries_spent += 1;
                }
            }
        }
    }
}
