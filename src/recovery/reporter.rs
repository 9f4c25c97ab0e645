//! Error handling facade: record building, ring log, listener fan-out

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::classifier::{classify_detail, severity_for, should_retry, user_message};
use super::log::ErrorLog;
use super::types::{
    ErrorCategory, ErrorSeverity, ErrorStatistics, ProcessedError, StatisticsFilter,
};
use crate::clock::{Clock, SystemClock};
use crate::error::{DefenseError, ErrorDetail};

/// Metadata key marking records built by the fallback path
const FALLBACK_KEY: &str = "fallback";
/// Metadata key carrying the retries already spent when the error arrived
const RETRY_COUNT_KEY: &str = "retry_count";

/// Handle for removing a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&ProcessedError) + Send + Sync>;

/// Builds, logs, and fans out processed error records
///
/// `handle_error` never fails: a panic while building the record yields the
/// fallback record, and listener panics are isolated per listener.
pub struct ErrorReporter {
    log: ErrorLog,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener_id: AtomicU64,
    seq: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    /// Reporter on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Reporter with an injected time source
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: ErrorLog::new(),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            seq: AtomicU64::new(0),
            clock,
        }
    }

    /// The ring log backing this reporter
    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    fn next_id(&self) -> String {
        format!(
            "err_{}_{}",
            self.clock.now_ms(),
            self.seq.fetch_add(1, Ordering::Relaxed)
        )
    }

    fn build_record(
        &self,
        error: &DefenseError,
        context: &str,
        metadata: &HashMap<String, Value>,
    ) -> ProcessedError {
        let detail = ErrorDetail::from_error(error);
        let category = classify_detail(&detail);
        let severity = severity_for(category, &detail);
        let retry_count = metadata
            .get(RETRY_COUNT_KEY)
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;

        ProcessedError {
            id: self.next_id(),
            timestamp: self.clock.now_utc(),
            context: context.to_string(),
            category,
            severity,
            original: detail,
            user_message: user_message(category).to_string(),
            should_retry: should_retry(category),
            retry_count,
            metadata: metadata.clone(),
        }
    }

    /// Record produced when building the real one panicked
    pub(super) fn fallback_record(&self, context: &str) -> ProcessedError {
        let mut metadata = HashMap::new();
        metadata.insert(FALLBACK_KEY.to_string(), Value::Bool(true));

        ProcessedError {
            id: self.next_id(),
            timestamp: self.clock.now_utc(),
            context: context.to_string(),
            category: ErrorCategory::System,
            severity: ErrorSeverity::High,
            original: ErrorDetail::new("UnknownError", "error details unavailable", None),
            user_message: user_message(ErrorCategory::System).to_string(),
            should_retry: false,
            retry_count: 0,
            metadata,
        }
    }

    /// Classify `error`, log it, and notify every listener
    ///
    /// Listeners run synchronously in registration order against a snapshot
    /// of the registry, so a listener may add or remove listeners without
    /// deadlocking; changes take effect from the next record.
    pub fn handle_error(
        &self,
        error: &DefenseError,
        context: &str,
        metadata: HashMap<String, Value>,
    ) -> ProcessedError {
        let record =
            match catch_unwind(AssertUnwindSafe(|| self.build_record(error, context, &metadata))) {
                Ok(record) => record,
                Err(_) => {
                    error!(context, "record building panicked, using fallback record");
                    self.fallback_record(context)
                }
            };

        match record.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => error!(
                id = %record.id,
                category = %record.category,
                severity = %record.severity,
                context,
                "handled error"
            ),
            ErrorSeverity::Medium => warn!(
                id = %record.id,
                category = %record.category,
                context,
                "handled error"
            ),
            ErrorSeverity::Low => debug!(
                id = %record.id,
                category = %record.category,
                context,
                "handled error"
            ),
        }

        self.log.push(record.clone());

        let listeners: Vec<(ListenerId, Listener)> = self.listeners.lock().clone();
        for (id, listener) in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(&record))).is_err() {
                warn!(listener = id.0, "error listener panicked");
            }
        }

        record
    }

    /// Register `listener`; it sees every record from the next one on
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ProcessedError) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Deregister a listener; false when the id is unknown
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Aggregate the logged records matching `filter`
    pub fn statistics(&self, filter: &StatisticsFilter) -> ErrorStatistics {
        self.log.statistics(filter, self.clock.now_ms())
    }

    /// Drop every logged record; listeners stay registered
    pub fn clear(&self) {
        self.log.clear();
    }
}
