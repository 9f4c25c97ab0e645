//! Logging bootstrap built on tracing
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the embedding application's job. These helpers cover the common
//! setups. `RUST_LOG` overrides the requested level when set.

use tracing_subscriber::EnvFilter;

/// Verbosity for the bootstrap helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Install the global human-readable subscriber at `level`
///
/// Panics when a subscriber is already installed; use [`try_init`] where
/// that can happen.
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .init();
}

/// Install the global subscriber with JSON output, for log shippers
pub fn init_json(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .json()
        .init();
}

/// Like [`init`] but keeps an already-installed subscriber, returning false
pub fn try_init(level: LogLevel) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .try_init()
        .is_ok()
}
