//! Abuse heuristics and block records

use std::time::Duration;

use tracing::{info, warn};

use super::limiter::{RateLimiter, BLOCK_PREFIX, RECORD_PREFIX};
use super::types::{ActionActivity, BlockRecord, BlockStatus, SuspicionReport};
use crate::error::Result;

/// How far back a record's last action may lie to count as recent
const RECENT_WINDOW_MS: i64 = 60 * 60 * 1000;
/// Risk points added per fired heuristic
const RISK_POINTS_PER_PATTERN: u8 = 25;
/// Distinct recent actions above which variety is suspicious
const ACTION_VARIETY_THRESHOLD: usize = 10;
/// Summed recent count above which volume is suspicious
const REQUEST_VOLUME_THRESHOLD: u64 = 1000;
/// Recent login attempts at which brute force is suspected
const LOGIN_ATTEMPT_THRESHOLD: u32 = 5;

/// Heuristic names, stable for logging and dashboards
const PATTERN_HIGH_ACTION_VARIETY: &str = "high_action_variety";
const PATTERN_HIGH_REQUEST_VOLUME: &str = "high_request_volume";
const PATTERN_BRUTE_FORCE_LOGIN: &str = "brute_force_login";

impl RateLimiter {
    fn block_key(identifier: &str) -> String {
        format!("{BLOCK_PREFIX}{identifier}")
    }

    /// Scan the identifier's counters active within the last hour and score
    /// them against the abuse heuristics
    pub async fn detect_suspicious_activity(&self, identifier: &str) -> Result<SuspicionReport> {
        let now = self.now_ms();
        let prefix = format!("{RECORD_PREFIX}{identifier}:");

        let mut recent_actions = Vec::new();
        for key in self.store().keys_with_prefix(&prefix).await? {
            if let Some(record) = self.load_record(&key).await? {
                // the prefix also matches identifiers extending this one
                // with a colon; the parsed record settles the ownership
                if record.identifier != identifier {
                    continue;
                }
                if now - record.last_action_at <= RECENT_WINDOW_MS {
                    recent_actions.push(ActionActivity {
                        action: record.action,
                        count: record.count,
                        last_action_at: record.last_action_at,
                    });
                }
            }
        }

        let mut patterns = Vec::new();
        if recent_actions.len() > ACTION_VARIETY_THRESHOLD {
            patterns.push(PATTERN_HIGH_ACTION_VARIETY.to_string());
        }
        let total: u64 = recent_actions.iter().map(|a| u64::from(a.count)).sum();
        if total > REQUEST_VOLUME_THRESHOLD {
            patterns.push(PATTERN_HIGH_REQUEST_VOLUME.to_string());
        }
        if recent_actions
            .iter()
            .any(|a| a.action == "login" && a.count >= LOGIN_ATTEMPT_THRESHOLD)
        {
            patterns.push(PATTERN_BRUTE_FORCE_LOGIN.to_string());
        }

        let risk_score =
            (patterns.len() as u8).saturating_mul(RISK_POINTS_PER_PATTERN).min(100);
        let is_suspicious = !patterns.is_empty();
        if is_suspicious {
            warn!(identifier, risk_score, ?patterns, "suspicious activity detected");
        }

        Ok(SuspicionReport {
            is_suspicious,
            patterns,
            risk_score,
            recent_actions,
        })
    }

    /// Write a block record for `identifier`, replacing any existing one
    pub async fn block_user(
        &self,
        identifier: &str,
        duration: Duration,
        reason: &str,
    ) -> Result<()> {
        let now = self.now_ms();
        let record = BlockRecord {
            identifier: identifier.to_string(),
            blocked_at: now,
            unblock_at: now + duration.as_millis() as i64,
            reason: reason.to_string(),
        };
        self.store()
            .set(&Self::block_key(identifier), &serde_json::to_string(&record)?)
            .await?;
        warn!(identifier, reason, unblock_at = record.unblock_at, "identifier blocked");
        Ok(())
    }

    /// Current block state for `identifier`
    ///
    /// Expiry is lazy: a lapsed or unreadable record is deleted on the read
    /// that discovers it.
    pub async fn is_user_blocked(&self, identifier: &str) -> Result<BlockStatus> {
        let key = Self::block_key(identifier);
        let Some(raw) = self.store().get(&key).await? else {
            return Ok(BlockStatus::default());
        };

        let record: BlockRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(identifier, %err, "discarding unparseable block record");
                self.store().remove(&key).await?;
                return Ok(BlockStatus::default());
            }
        };

        let now = self.now_ms();
        if now > record.unblock_at {
            info!(identifier, "block lapsed");
            self.store().remove(&key).await?;
            return Ok(BlockStatus::default());
        }

        Ok(BlockStatus {
            blocked: true,
            reason: Some(record.reason),
            unblock_at: Some(record.unblock_at),
            remaining_ms: Some(record.unblock_at - now),
        })
    }
}
