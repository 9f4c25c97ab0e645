//! Whole-pipeline integration tests
//!
//! Drives all four filters off one configuration document, the way the
//! storefront wires them: orders are validated and sanitized, actions are
//! rate limited, uploads are vetted, and failures are classified.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use storeguard::clock::ManualClock;
    use storeguard::config::DefenseConfig;
    use storeguard::error::DefenseError;
    use storeguard::input::InputValidator;
    use storeguard::ratelimit::RateLimiter;
    use storeguard::recovery::{ErrorCategory, ErrorReporter, RetryError, RetryPolicy};
    use storeguard::storage::MemoryStore;
    use storeguard::upload::{FileKind, FileValidator};

    use crate::common::assertions::{assert_field_error, assert_rejected_with};
    use crate::common::fixtures::{png_upload, valid_order};
    use crate::common::TEST_NOW_MS;

    // ==================== Checkout Story Tests ====================

    #[tokio::test]
    async fn test_checkout_story_under_config_limits() {
        let config = DefenseConfig::from_yaml(
            r#"
rate_limit:
  actions:
    createOrder:
      requests: 2
      window_ms: 60000
"#,
        )
        .unwrap();

        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));
        let limiter = RateLimiter::with_clock(
            Arc::new(MemoryStore::new()),
            config.rate_limit.clone(),
            clock.clone(),
        );
        let validator = InputValidator::new(config.input.clone());
        let reporter = ErrorReporter::with_clock(clock);

        let mut order = valid_order();
        order.customer.note = "Please gift-wrap. <b>Signed copy</b> requested.".to_string();

        for _ in 0..2 {
            let checked = validator.validate_order_payload(&order);
            assert!(checked.is_valid, "unexpected errors: {:?}", checked.errors);
            let sanitized = checked.sanitized.unwrap();
            assert_eq!(
                sanitized.customer.note,
                "Please gift-wrap. Signed copy requested."
            );

            limiter
                .with_rate_limit("customer-7", "createOrder", None, || async { Ok(()) })
                .await
                .unwrap();
        }

        let denied: storeguard::error::Result<()> = limiter
            .with_rate_limit("customer-7", "createOrder", None, || async { Ok(()) })
            .await;
        let err = denied.unwrap_err();

        let record = reporter.handle_error(&err, "checkout", HashMap::new());
        assert_eq!(record.category, ErrorCategory::System);
        assert!(!record.should_retry);
        assert_eq!(record.original.name, "RateLimitError");
    }

    #[tokio::test]
    async fn test_brute_force_story_locks_the_account() {
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));
        let limiter = RateLimiter::with_clock(
            Arc::new(MemoryStore::new()),
            DefenseConfig::default().rate_limit,
            clock,
        );
        let validator = InputValidator::new(DefenseConfig::default().input);

        // the hostile payload never reaches the backend
        let mut order = valid_order();
        order.customer.name = "x'; DROP TABLE books;--".to_string();
        let checked = validator.validate_order_payload(&order);
        assert_field_error(&checked, "customer.name");

        // five failed sign-ins exhaust the login budget
        for _ in 0..5 {
            limiter
                .record_action("shopper@example.com", "login", None)
                .await
                .unwrap();
        }
        let decision = limiter
            .check_limit("shopper@example.com", "login", None)
            .await
            .unwrap();
        assert!(!decision.allowed);

        let report = limiter
            .detect_suspicious_activity("shopper@example.com")
            .await
            .unwrap();
        assert!(report.is_suspicious);

        limiter
            .block_user(
                "shopper@example.com",
                Duration::from_secs(15 * 60),
                "brute force login",
            )
            .await
            .unwrap();
        let status = limiter.is_user_blocked("shopper@example.com").await.unwrap();
        assert!(status.blocked);
        assert_eq!(status.remaining_ms, Some(15 * 60 * 1000));
    }

    // ==================== Config Propagation Tests ====================

    #[tokio::test]
    async fn test_config_file_drives_every_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defense.yaml");
        tokio::fs::write(
            &path,
            r#"
upload:
  max_image_dimension: 1000
input:
  text_max_len: 10
retry:
  max_retries: 1
  base_delay_ms: 5
  max_delay_ms: 20
  jitter: false
"#,
        )
        .await
        .unwrap();

        let config = DefenseConfig::from_file(&path).await.unwrap();

        let upload_validator = FileValidator::with_clock(
            config.upload.clone(),
            Arc::new(ManualClock::new(TEST_NOW_MS)),
        );
        let report = upload_validator.validate(&png_upload("banner.png", 2000, 400), FileKind::Image);
        assert_rejected_with(&report, "exceed the maximum of 1000");

        let input_validator = InputValidator::new(config.input.clone());
        let checked = input_validator.validate_text("eleven chars", "Review");
        assert!(!checked.is_valid);
        assert_eq!(
            checked.error.as_deref(),
            Some("Review must be at most 10 characters")
        );

        let policy = RetryPolicy::new(config.retry.clone());
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = calls.clone();
        let outcome: Result<(), RetryError> = policy
            .run(move || {
                let calls = calls_in.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(DefenseError::network("backend unreachable"))
                }
            })
            .await;

        assert!(matches!(
            outcome,
            Err(RetryError::Exhausted { attempts: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
