use std::fmt::{self, Display};

/// Terminal outcome of fetching a single [`Target`](crate::Target)
///
/// Every target ends in exactly one of these states. Outcomes are only used
/// for diagnostics; they never appear on the URL output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response body was read to the end
    Completed {
        /// Number of URL lines emitted
        lines: usize,
    },
    /// Every attempt failed before a response arrived
    Abandoned {
        /// Number of failed attempts
        attempts: u64,
    },
    /// Reading the response body stopped early
    Truncated {
        /// Number of URL lines emitted before the body broke off
        lines: usize,
    },
}

impl Outcome {
    /// Number of URL lines this target contributed to the output
    #[must_use]
    pub const fn lines(&self) -> usize {
        match self {
            Outcome::Completed { lines } | Outcome::Truncated { lines } => *lines,
            Outcome::Abandoned { .. } => 0,
        }
    }

    /// Returns `true` if the body was read to the end
    #[inline]
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    /// Returns `true` if the target was given up after exhausting its retries
    #[inline]
    #[must_use]
    pub const fn is_abandoned(&self) -> bool {
        matches!(self, Outcome::Abandoned { .. })
    }

    /// Returns `true` if the body stopped before the end
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Outcome::Truncated { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed { lines } => write!(f, "completed with {lines} URLs"),
            Outcome::Abandoned { attempts } => write!(f, "abandoned after {attempts} attempts"),
            Outcome::Truncated { lines } => write!(f, "truncated after {lines} URLs"),
        }
    }
}
