//! Error classification, retry with backoff, and the error reporter

mod classifier;
mod log;
mod reporter;
mod retry;
mod types;


pub use classifier::{
    classify, classify_detail, severity_for, should_retry, user_message, CLASSIFIER_TABLE_VERSION,
};
pub use log::{ErrorLog, ERROR_LOG_CAPACITY};
pub use reporter::{ErrorReporter, ListenerId};
pub use retry::{RetryObserver, RetryPolicy};
pub use types::{
    ErrorCategory, ErrorSeverity, ErrorStatistics, ProcessedError, RetryError, StatisticsFilter,
};
