//! Common test utilities for storeguard
//!
//! This module provides shared test infrastructure for all tests:
//! - Factories for uploads and checkout payloads
//! - A recording media transport double
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{assertions, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let upload = fixtures::png_upload("cover.png", 800, 600);
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{StubTransport, TEST_NOW_MS};
