//! # Storeguard
//!
//! Client-side defense pipeline for storefront applications: every piece of
//! untrusted input passes through one of four independent filters before it
//! can touch persisted state or reach a user-visible message.
//!
//! ## Features
//!
//! - **Rate limiting & abuse detection**: fixed-window counters over a
//!   pluggable key-value store, heuristic abuse scoring, and block records
//! - **File upload validation**: staged checks from size and MIME type down
//!   to magic bytes, embedded-payload scanning, and image dimensions
//! - **Input validation & sanitization**: field validators, markup
//!   stripping, and a data-driven injection-signature matcher
//! - **Error classification & retry**: a category/severity taxonomy,
//!   classified exponential backoff, and a bounded error log with listeners
//!
//! The filters never call each other; the application composes them.
//!
//! ## Rate limiting an action
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use storeguard::config::DefenseConfig;
//! use storeguard::ratelimit::RateLimiter;
//! use storeguard::storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DefenseConfig::default();
//!     let limiter = RateLimiter::new(Arc::new(MemoryStore::new()), config.rate_limit);
//!
//!     let decision = limiter.check_limit("user-17", "login", None).await?;
//!     if decision.allowed {
//!         limiter.record_action("user-17", "login", None).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Vetting an upload
//!
//! ```rust
//! use bytes::Bytes;
//! use storeguard::upload::{FileKind, FileUpload, FileValidator};
//!
//! let validator = FileValidator::default();
//! let upload = FileUpload::new("cover.png", "image/png", Bytes::from_static(&[0u8; 4]));
//!
//! let report = validator.validate(&upload, FileKind::Image);
//! assert!(!report.is_valid, "zeroed bytes are not a PNG");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod ratelimit;
pub mod recovery;
pub mod storage;
pub mod upload;

// Re-export the main entry points
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DefenseConfig;
pub use error::{DefenseError, ErrorDetail, Result};
pub use input::InputValidator;
pub use ratelimit::RateLimiter;
pub use recovery::{ErrorReporter, RetryPolicy};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use upload::{FileKind, FileUpload, FileValidator};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "storeguard");
    }
}
