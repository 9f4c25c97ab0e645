//! Rate limiter integration tests
//!
//! Exercises the limiter against the durable file store and walks the
//! detect-block-unblock cycle the application drives.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use storeguard::clock::ManualClock;
    use storeguard::config::{ActionLimit, RateLimitSettings};
    use storeguard::error::DefenseError;
    use storeguard::ratelimit::{client_fingerprint, RateLimiter};
    use storeguard::storage::{JsonFileStore, MemoryStore};

    use crate::common::TEST_NOW_MS;

    fn memory_limiter() -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));
        let limiter = RateLimiter::with_clock(
            Arc::new(MemoryStore::new()),
            RateLimitSettings::default(),
            clock.clone(),
        );
        (limiter, clock)
    }

    // ==================== Durable Store Tests ====================

    #[tokio::test]
    async fn test_counters_survive_a_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("limits.json");
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));

        {
            let store = Arc::new(JsonFileStore::open(&path).await?);
            let limiter = RateLimiter::with_clock(
                store,
                RateLimitSettings::default(),
                clock.clone(),
            );
            for _ in 0..3 {
                limiter.record_action("u1", "login", None).await?;
            }
        }

        let store = Arc::new(JsonFileStore::open(&path).await?);
        let limiter = RateLimiter::with_clock(store, RateLimitSettings::default(), clock);
        let decision = limiter.check_limit("u1", "login", None).await?;
        assert_eq!(decision.remaining, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_blocks_survive_a_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("blocks.json");
        let clock = Arc::new(ManualClock::new(TEST_NOW_MS));

        {
            let store = Arc::new(JsonFileStore::open(&path).await?);
            let limiter = RateLimiter::with_clock(
                store,
                RateLimitSettings::default(),
                clock.clone(),
            );
            limiter
                .block_user("u1", Duration::from_secs(3600), "manual review")
                .await?;
        }

        let store = Arc::new(JsonFileStore::open(&path).await?);
        let limiter = RateLimiter::with_clock(store, RateLimitSettings::default(), clock);
        let status = limiter.is_user_blocked("u1").await?;
        assert!(status.blocked);
        assert_eq!(status.reason.as_deref(), Some("manual review"));
        Ok(())
    }

    #[tokio::test]
    async fn test_fingerprint_is_anchored_to_its_store() {
        let dir = tempfile::tempdir().unwrap();

        let a = JsonFileStore::open(dir.path().join("a.json")).await.unwrap();
        let b = JsonFileStore::open(dir.path().join("b.json")).await.unwrap();
        let fingerprint_a = client_fingerprint(&a).await.unwrap();
        let fingerprint_b = client_fingerprint(&b).await.unwrap();
        assert_ne!(fingerprint_a, fingerprint_b);

        drop(a);
        let reopened = JsonFileStore::open(dir.path().join("a.json")).await.unwrap();
        assert_eq!(client_fingerprint(&reopened).await.unwrap(), fingerprint_a);
    }

    // ==================== Abuse Cycle Tests ====================

    #[tokio::test]
    async fn test_detect_block_unblock_cycle() {
        let (limiter, clock) = memory_limiter();

        for _ in 0..5 {
            limiter.record_action("attacker", "login", None).await.unwrap();
        }

        let report = limiter.detect_suspicious_activity("attacker").await.unwrap();
        assert!(report.is_suspicious);
        assert!(report.patterns.contains(&"brute_force_login".to_string()));

        limiter
            .block_user(
                "attacker",
                Duration::from_secs(30 * 60),
                &format!("suspicious activity: {}", report.patterns.join(", ")),
            )
            .await
            .unwrap();

        let status = limiter.is_user_blocked("attacker").await.unwrap();
        assert!(status.blocked);
        assert!(status.reason.unwrap().contains("brute_force_login"));

        clock.advance(30 * 60 * 1000 + 1);
        assert!(!limiter.is_user_blocked("attacker").await.unwrap().blocked);
    }

    #[tokio::test]
    async fn test_cleanup_sweeps_stale_identifiers() {
        let (limiter, clock) = memory_limiter();

        for i in 0..30 {
            limiter
                .record_action(&format!("user{i}"), "search", None)
                .await
                .unwrap();
        }

        // search runs on a one minute window
        clock.advance(60_000 + 24 * 60 * 60 * 1000 + 1);
        assert_eq!(limiter.cleanup().await.unwrap(), 30);

        let decision = limiter.check_limit("user0", "search", None).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 120);
    }

    // ==================== Gated Operation Tests ====================

    #[tokio::test]
    async fn test_denial_carries_retry_after() {
        let (limiter, _clock) = memory_limiter();
        let custom = Some(ActionLimit::new(1, 60_000));

        let first = limiter
            .with_rate_limit("u1", "export", custom, || async { Ok("done") })
            .await;
        assert_eq!(first.unwrap(), "done");

        let second = limiter
            .with_rate_limit("u1", "export", custom, || async { Ok("done") })
            .await;
        match second {
            Err(DefenseError::RateLimited {
                action,
                retry_after_secs,
            }) => {
                assert_eq!(action, "export");
                assert_eq!(retry_after_secs, 60);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }
}
