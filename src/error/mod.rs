//! Error handling for the defense pipeline
//!
//! Defines the crate-wide error type, the `Result` alias, and the extracted
//! detail view consumed by the error classifier.

mod helpers;
mod types;


pub use types::{DefenseError, ErrorDetail, Result};
