use std::fmt;

/// Wrapper struct around `elapsed.as_secs()` for the run summary.
///
/// Always rendered as whole minutes followed by the remaining seconds, so an
/// hour shows up as `60 Minute 0 Second`.
pub(crate) struct Duration {
    elapsed: u64,
}

impl Duration {
    /// Create a new `Duration` from the given number of seconds.
    pub(crate) const fn from_secs(elapsed: u64) -> Self {
        Self { elapsed }
    }
}

impl From<std::time::Duration> for Duration {
    fn from(elapsed: std::time::Duration) -> Self {
        Self::from_secs(elapsed.as_secs())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.elapsed / 60;
        let seconds = self.elapsed % 60;
        write!(f, "{minutes} Minute {seconds} Second")
    }
}
