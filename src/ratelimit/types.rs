//! Rate limiting record and result types

use serde::{Deserialize, Serialize};

/// Persisted counter state for one identifier and action pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Client identifier the counter belongs to
    pub identifier: String,
    /// Action being counted
    pub action: String,
    /// Actions recorded inside the current window
    pub count: u32,
    /// Unix milliseconds at which the current window ends
    pub window_reset_at: i64,
    /// Unix milliseconds of the most recent recorded action
    pub last_action_at: i64,
}

/// Outcome of a limit check; a pure read, nothing is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitDecision {
    /// Whether the action would be admitted right now
    pub allowed: bool,
    /// Budget left in the current window
    pub remaining: u32,
    /// Unix milliseconds at which the window resets
    pub reset_at: i64,
    /// Seconds to wait when denied, zero when allowed
    pub retry_after_secs: u64,
}

/// Outcome of recording one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    /// Count inside the current window, including this action
    pub count: u32,
    /// Budget left in the current window
    pub remaining: u32,
    /// Unix milliseconds at which the window resets
    pub reset_at: i64,
}

/// Persisted block state for one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Blocked identifier
    pub identifier: String,
    /// Unix milliseconds at which the block was written
    pub blocked_at: i64,
    /// Unix milliseconds at which the block lapses
    pub unblock_at: i64,
    /// Operator-facing reason
    pub reason: String,
}

/// Lazily-expired view of an identifier's block state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockStatus {
    /// Whether the identifier is currently blocked
    pub blocked: bool,
    /// Reason recorded when the block was written
    pub reason: Option<String>,
    /// Unix milliseconds at which the block lapses
    pub unblock_at: Option<i64>,
    /// Milliseconds left until the block lapses
    pub remaining_ms: Option<i64>,
}

/// Activity seen for one action inside the recent window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionActivity {
    /// Action name
    pub action: String,
    /// Count inside the record's window
    pub count: u32,
    /// Unix milliseconds of the most recent recorded action
    pub last_action_at: i64,
}

/// Abuse heuristics verdict for one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspicionReport {
    /// Whether any heuristic fired
    pub is_suspicious: bool,
    /// Names of the heuristics that fired
    pub patterns: Vec<String>,
    /// Accumulated risk, 0 to 100
    pub risk_score: u8,
    /// Activity the verdict was computed from
    pub recent_actions: Vec<ActionActivity>,
}
