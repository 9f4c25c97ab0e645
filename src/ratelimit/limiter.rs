//! Fixed-window rate limiter over an injected key-value store

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::types::{ActionReceipt, LimitDecision, RateLimitRecord};
use crate::clock::{Clock, SystemClock};
use crate::config::{ActionLimit, RateLimitSettings};
use crate::error::{DefenseError, Result};
use crate::storage::KeyValueStore;

/// Key prefix for counter records
pub(super) const RECORD_PREFIX: &str = "ratelimit:count:";
/// Key prefix for block records
pub(super) const BLOCK_PREFIX: &str = "ratelimit:block:";

/// Fixed-window request limiter
///
/// Counters live in the injected store under
/// `ratelimit:count:{identifier}:{action}`. A window starts on the first
/// recorded action and expires as a whole; expiry is evaluated lazily on
/// the next touch, so idle records cost nothing until cleanup sweeps them.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: RateLimitSettings,
}

impl RateLimiter {
    /// Build a limiter over `store` with the given settings
    pub fn new(store: Arc<dyn KeyValueStore>, settings: RateLimitSettings) -> Self {
        Self::with_clock(store, settings, Arc::new(SystemClock))
    }

    /// Build a limiter with an injected time source
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        settings: RateLimitSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// The settings this limiter runs on
    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    pub(super) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub(super) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Budget applied to `action`: explicit override, configured entry, or
    /// the settings fallback, in that order
    fn limit_for(&self, action: &str, custom: Option<ActionLimit>) -> ActionLimit {
        custom
            .or_else(|| self.settings.actions.get(action).copied())
            .unwrap_or(self.settings.default_limit)
    }

    fn record_key(identifier: &str, action: &str) -> String {
        format!("{RECORD_PREFIX}{identifier}:{action}")
    }

    /// Load and parse the counter under `key`; unparseable records are
    /// treated as absent so one corrupted entry cannot wedge an identifier
    pub(super) async fn load_record(&self, key: &str) -> Result<Option<RateLimitRecord>> {
        match self.store.get(key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(record) => Ok(Some(record)),
                Err(err) => {
                    warn!(key, %err, "discarding unparseable rate limit record");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Current state for the pair without recording anything
    pub async fn check_limit(
        &self,
        identifier: &str,
        action: &str,
        custom: Option<ActionLimit>,
    ) -> Result<LimitDecision> {
        let limit = self.limit_for(action, custom);
        let now = self.now_ms();
        let record = self.load_record(&Self::record_key(identifier, action)).await?;

        let (count, reset_at) = match record {
            Some(record) if now <= record.window_reset_at => {
                (record.count, record.window_reset_at)
            }
            _ => (0, now + limit.window_ms as i64),
        };

        let allowed = count < limit.requests;
        Ok(LimitDecision {
            allowed,
            remaining: limit.requests.saturating_sub(count),
            reset_at,
            retry_after_secs: if allowed {
                0
            } else {
                ((reset_at - now).max(0) as u64).div_ceil(1000)
            },
        })
    }

    /// Count one action against the pair's budget
    ///
    /// Opens a fresh window when none is active. Check-then-record is not
    /// atomic across callers; concurrent racers may both be admitted, which
    /// the advisory contract accepts.
    pub async fn record_action(
        &self,
        identifier: &str,
        action: &str,
        custom: Option<ActionLimit>,
    ) -> Result<ActionReceipt> {
        let limit = self.limit_for(action, custom);
        let now = self.now_ms();
        let key = Self::record_key(identifier, action);

        let mut record = match self.load_record(&key).await? {
            Some(record) if now <= record.window_reset_at => record,
            _ => RateLimitRecord {
                identifier: identifier.to_string(),
                action: action.to_string(),
                count: 0,
                window_reset_at: now + limit.window_ms as i64,
                last_action_at: now,
            },
        };
        record.count = record.count.saturating_add(1);
        record.last_action_at = now;
        self.store.set(&key, &serde_json::to_string(&record)?).await?;

        debug!(identifier, action, count = record.count, "recorded action");
        Ok(ActionReceipt {
            count: record.count,
            remaining: limit.requests.saturating_sub(record.count),
            reset_at: record.window_reset_at,
        })
    }

    /// Undo one recorded action, never dropping the count below zero
    pub(super) async fn revert_action(&self, identifier: &str, action: &str) -> Result<()> {
        let key = Self::record_key(identifier, action);
        if let Some(mut record) = self.load_record(&key).await? {
            if record.count > 0 {
                record.count -= 1;
                self.store.set(&key, &serde_json::to_string(&record)?).await?;
                debug!(identifier, action, count = record.count, "reverted action");
            }
        }
        Ok(())
    }

    /// Gate `op` behind the limiter
    ///
    /// A denied call returns [`DefenseError::RateLimited`] without running
    /// `op`. When `op` fails with an infrastructure error, the action just
    /// recorded is reverted so outages do not burn request budgets.
    pub async fn with_rate_limit<F, Fut, T>(
        &self,
        identifier: &str,
        action: &str,
        custom: Option<ActionLimit>,
        op: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let decision = self.check_limit(identifier, action, custom).await?;
        if !decision.allowed {
            warn!(
                identifier,
                action,
                retry_after_secs = decision.retry_after_secs,
                "action denied by rate limit"
            );
            return Err(DefenseError::RateLimited {
                action: action.to_string(),
                retry_after_secs: decision.retry_after_secs,
            });
        }

        self.record_action(identifier, action, custom).await?;
        match op().await {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_infrastructure() {
                    debug!(identifier, action, "reverting count after infrastructure failure");
                    if let Err(revert_err) = self.revert_action(identifier, action).await {
                        warn!(identifier, action, %revert_err, "failed to revert count");
                    }
                }
                Err(err)
            }
        }
    }

    /// Purge counters whose window expired more than the configured age
    /// ago, along with anything unparseable. Returns the number removed.
    pub async fn cleanup(&self) -> Result<usize> {
        let now = self.now_ms();
        let max_age = self.settings.cleanup_max_age_ms as i64;
        let mut removed = 0;

        for key in self.store.keys_with_prefix(RECORD_PREFIX).await? {
            let stale = match self.store.get(&key).await? {
                Some(raw) => match serde_json::from_str::<RateLimitRecord>(&raw) {
                    Ok(record) => now - record.window_reset_at > max_age,
                    Err(_) => true,
                },
                None => false,
            };
            if stale {
                self.store.remove(&key).await?;
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, "purged stale rate limit records");
        }
        Ok(removed)
    }
}
