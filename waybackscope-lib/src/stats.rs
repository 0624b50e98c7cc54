//! Error bookkeeping shared by all workers of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which bucket a failed HTTP attempt is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request ran into the configured timeout
    Timeout,
    /// Any other transport or body-read failure
    Other,
}

impl From<&reqwest::Error> for ErrorClass {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ErrorClass::Timeout
        } else {
            ErrorClass::Other
        }
    }
}

/// Failed-attempt counters shared by all workers of a run
///
/// Counters only ever grow. Each failed HTTP attempt counts once, so a
/// domain that needed two retries before succeeding still contributes two
/// errors.
#[derive(Debug, Default)]
pub struct ErrorCounters {
    timeouts: AtomicU64,
    others: AtomicU64,
}

impl ErrorCounters {
    /// Create a fresh set of counters, both at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one failed attempt in the given bucket
    pub fn record(&self, class: ErrorClass) {
        let counter = match class {
            ErrorClass::Timeout => &self.timeouts,
            ErrorClass::Other => &self.others,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of attempts that timed out
    #[must_use]
    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Number of attempts that failed for any other reason
    #[must_use]
    pub fn others(&self) -> u64 {
        self.others.load(Ordering::Relaxed)
    }

    /// Sum of both buckets
    #[must_use]
    pub fn total(&self) -> u64 {
        self.timeouts() + self.others()
    }
}
