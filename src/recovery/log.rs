//! Bounded in-memory error log

use std::collections::HashMap;
use std::collections::VecDeque;

use parking_lot::Mutex;

use super::types::{ErrorStatistics, ProcessedError, StatisticsFilter};

/// Records kept before the oldest is evicted
pub const ERROR_LOG_CAPACITY: usize = 1000;
/// Records included in a statistics snapshot
const MAX_RECENT_ERRORS: usize = 10;

/// Ring log of processed errors, oldest evicted first
pub struct ErrorLog {
    entries: Mutex<VecDeque<ProcessedError>>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLog {
    /// Log with the standard capacity
    pub fn new() -> Self {
        Self::with_capacity(ERROR_LOG_CAPACITY)
    }

    /// Log bounded at `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Append a record, evicting the oldest when full
    pub fn push(&self, record: ProcessedError) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(record);
    }

    /// Records currently held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the log holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every record
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Copy of the log, oldest first
    pub fn snapshot(&self) -> Vec<ProcessedError> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Aggregate the records matching `filter`
    ///
    /// `now_ms` anchors the trailing time window, so callers with an
    /// injected clock get deterministic slices.
    pub fn statistics(&self, filter: &StatisticsFilter, now_ms: i64) -> ErrorStatistics {
        let entries = self.entries.lock();
        let cutoff = filter.time_range_ms.map(|range| now_ms - range);

        let matching: Vec<&ProcessedError> = entries
            .iter()
            .filter(|record| {
                if let Some(category) = filter.category {
                    if record.category != category {
                        return false;
                    }
                }
                if let Some(severity) = filter.severity {
                    if record.severity != severity {
                        return false;
                    }
                }
                if let Some(cutoff) = cutoff {
                    if record.timestamp.timestamp_millis() < cutoff {
                        return false;
                    }
                }
                true
            })
            .collect();

        let mut category_breakdown = HashMap::new();
        let mut severity_breakdown = HashMap::new();
        for record in &matching {
            *category_breakdown.entry(record.category).or_insert(0usize) += 1;
            *severity_breakdown.entry(record.severity).or_insert(0usize) += 1;
        }

        let recent_errors = matching
            .iter()
            .rev()
            .take(MAX_RECENT_ERRORS)
            .map(|record| (*record).clone())
            .collect();

        ErrorStatistics {
            total: matching.len(),
            category_breakdown,
            severity_breakdown,
            recent_errors,
        }
    }
}
