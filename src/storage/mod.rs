//! Key-value persistence for the defense pipeline
//!
//! The rate limiter and abuse detector keep their records behind the narrow
//! [`KeyValueStore`] trait. Two implementations ship with the crate: an
//! in-memory store for tests and ephemeral deployments, and a JSON file
//! store for installs that persist counters across restarts.

mod file;
mod kv;
mod memory;


pub use file::JsonFileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
