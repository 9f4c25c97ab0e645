//! Recovery pipeline integration tests
//!
//! Couples the retry engine and the error reporter the way the storefront
//! does: failures come out of gated operations, get retried when eligible,
//! and end up as classified records in the log.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::json;
    use storeguard::clock::ManualClock;
    use storeguard::config::{RateLimitSettings, RetrySettings};
    use storeguard::error::DefenseError;
    use storeguard::ratelimit::RateLimiter;
    use storeguard::recovery::{
        ErrorCategory, ErrorReporter, ErrorSeverity, RetryError, RetryObserver, RetryPolicy,
        StatisticsFilter,
    };
    use storeguard::storage::MemoryStore;

    use crate::common::TEST_NOW_MS;

    fn fast_retry(max_retries: u32) -> RetrySettings {
        RetrySettings {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 10,
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    struct RecordingObserver {
        attempts: Mutex<Vec<u32>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
            }
        }
    }

    impl RetryObserver for RecordingObserver {
        fn on_retry(&self, attempt: u32, _delay: Duration, _error: &DefenseError) {
            self.attempts.lock().push(attempt);
        }
    }

    // ==================== Gated Failure Tests ====================

    #[tokio::test]
    async fn test_refunded_denial_lands_in_the_log() {
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));
        let limiter = RateLimiter::with_clock(
            Arc::new(MemoryStore::new()),
            RateLimitSettings::default(),
            clock.clone(),
        );
        let reporter = ErrorReporter::with_clock(clock);

        let result: storeguard::error::Result<()> = limiter
            .with_rate_limit("u1", "api", None, || async {
                Err(DefenseError::network("connection refused"))
            })
            .await;
        let err = result.unwrap_err();

        // the infrastructure failure refunded the recorded action
        let decision = limiter.check_limit("u1", "api", None).await.unwrap();
        assert_eq!(decision.remaining, 60);

        let record = reporter.handle_error(&err, "inventory sync", HashMap::new());
        assert_eq!(record.category, ErrorCategory::Network);
        assert!(record.should_retry);
        assert_eq!(reporter.log().len(), 1);
    }

    // ==================== Retry-To-Report Tests ====================

    #[tokio::test]
    async fn test_exhaustion_feeds_the_reporter() {
        let reporter = ErrorReporter::with_clock(Arc::new(ManualClock::new(TEST_NOW_MS)));
        let policy = RetryPolicy::new(fast_retry(2));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_in = calls.clone();
        let outcome: Result<(), RetryError> = policy
            .run(move || {
                let calls = calls_in.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(DefenseError::media_service("upstream returned 503"))
                }
            })
            .await;

        let failure = outcome.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let attempts = match &failure {
            RetryError::Exhausted { attempts, .. } => *attempts,
            other => panic!("expected Exhausted, got {other:?}"),
        };

        let mut metadata = HashMap::new();
        metadata.insert("retry_count".to_string(), json!(attempts - 1));
        let record = reporter.handle_error(failure.inner(), "cover upload", metadata);

        assert_eq!(record.category, ErrorCategory::MediaService);
        assert_eq!(record.severity, ErrorSeverity::Medium);
        assert_eq!(record.retry_count, 2);
        assert!(record.should_retry);
    }

    #[tokio::test]
    async fn test_observer_sees_each_retry() {
        let observer = Arc::new(RecordingObserver::new());
        let policy = RetryPolicy::new(fast_retry(3)).with_observer(observer.clone());
        let calls = Arc::new(AtomicU32::new(0));

        let calls_in = calls.clone();
        let outcome = policy
            .run(move || {
                let calls = calls_in.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(DefenseError::timeout("catalog lookup"))
                    } else {
                        Ok("catalog ready")
                    }
                }
            })
            .await;

        assert_eq!(outcome.unwrap(), "catalog ready");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*observer.attempts.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_validation_failure_is_not_retried() {
        let policy = RetryPolicy::new(fast_retry(5));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_in = calls.clone();
        let outcome: Result<(), RetryError> = policy
            .run(move || {
                let calls = calls_in.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(DefenseError::validation("email is malformed"))
                }
            })
            .await;

        assert!(matches!(outcome, Err(RetryError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // ==================== Statistics Tests ====================

    #[tokio::test]
    async fn test_statistics_over_a_mixed_workload() {
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));
        let reporter = ErrorReporter::with_clock(clock.clone());

        reporter.handle_error(
            &DefenseError::network("stale failure"),
            "warmup",
            HashMap::new(),
        );
        clock.advance(10 * 60 * 1000);
        reporter.handle_error(
            &DefenseError::media_service("thumbnail render failed"),
            "cover upload",
            HashMap::new(),
        );
        reporter.handle_error(
            &DefenseError::validation("phone is malformed"),
            "checkout",
            HashMap::new(),
        );

        let all = reporter.statistics(&StatisticsFilter::default());
        assert_eq!(all.total, 3);
        assert_eq!(all.category_breakdown.get(&ErrorCategory::Network), Some(&1));

        let recent = reporter.statistics(&StatisticsFilter {
            time_range_ms: Some(5 * 60 * 1000),
            ..Default::default()
        });
        assert_eq!(recent.total, 2);
        assert!(!recent
            .recent_errors
            .iter()
            .any(|record| record.context == "warmup"));

        let media_only = reporter.statistics(&StatisticsFilter {
            category: Some(ErrorCategory::MediaService),
            ..Default::default()
        });
        assert_eq!(media_only.total, 1);
        assert_eq!(media_only.recent_errors[0].context, "cover upload");
    }
}
