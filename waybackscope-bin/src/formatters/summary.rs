use std::fmt::{self, Display};
use std::time::Duration as StdDuration;

use waybackscope_lib::ErrorCounters;

use super::color::{DIM, GREEN, PINK, YELLOW, color};
use super::duration::Duration;

/// Final report of a run: elapsed time and failed attempts per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    elapsed: StdDuration,
    timeouts: u64,
    others: u64,
}

impl RunSummary {
    /// Snapshot the counters after the pipeline has finished
    pub(crate) fn new(elapsed: StdDuration, counters: &ErrorCounters) -> Self {
        Self {
            elapsed,
            timeouts: counters.timeouts(),
            others: counters.others(),
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = Duration::from(self.elapsed);
        color!(f, GREEN, "Time taken: {}", time)?;
        writeln!(f)?;

        if self.timeouts > 0 {
            color!(f, YELLOW, "Timeout Errors: {}", self.timeouts)?;
        } else {
            color!(f, DIM, "Timeout Errors: {}", self.timeouts)?;
        }
        writeln!(f)?;

        if self.others > 0 {
            color!(f, PINK, "Other Errors:   {}", self.others)
        } else {
            color!(f, DIM, "Other Errors:   {}", self.others)
        }
    }
}
