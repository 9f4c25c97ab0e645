//! Client fingerprinting for abuse correlation

use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key holding the per-install random id
const INSTALL_ID_KEY: &str = "defense:install-id";
/// Bytes of the digest kept in the fingerprint
const FINGERPRINT_BYTES: usize = 16;

async fn install_id(store: &dyn KeyValueStore) -> Result<String> {
    if let Some(id) = store.get(INSTALL_ID_KEY).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    store.set(INSTALL_ID_KEY, &id).await?;
    debug!("generated install id");
    Ok(id)
}

fn host_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string())
}

/// Stable fingerprint for this install
///
/// Hashes platform facts together with a random id persisted in `store` on
/// first use, so two installs on identical machines still differ.
pub async fn client_fingerprint(store: &dyn KeyValueStore) -> Result<String> {
    let id = install_id(store).await?;

    let mut hasher = Sha256::new();
    hasher.update(std::env::consts::OS.as_bytes());
    hasher.update(std::env::consts::ARCH.as_bytes());
    hasher.update(host_name().as_bytes());
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();

    Ok(hex::encode(&digest[..FINGERPRINT_BYTES]))
}
