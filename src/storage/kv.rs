//! The storage contract consumed by the stateful components

use async_trait::async_trait;

use crate::error::Result;

/// String-keyed storage used for rate limit counters and block records
///
/// Implementations must tolerate concurrent calls. Callers perform
/// read-modify-write sequences without holding a lock across them, so
/// atomicity across calls is explicitly not part of this contract.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys beginning with `prefix`, in unspecified order
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
