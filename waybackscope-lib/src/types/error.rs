use std::path::PathBuf;
use thiserror::Error;

/// Possible errors when setting up a `waybackscope_lib` run
///
/// Per-request failures never show up here: they are folded into
/// [`ErrorCounters`](crate::ErrorCounters) at the fetcher boundary.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The domain list file could not be opened or read
    #[error("Cannot read domain list `{}`: {}", .0.display(), .1)]
    DomainList(PathBuf, #[source] std::io::Error),

    /// The archive endpoint is not a valid URL
    #[error("Invalid archive endpoint `{0}`: {1}")]
    InvalidArchiveUrl(String, #[source] url::ParseError),

    /// The User-Agent cannot be sent as an HTTP header value
    #[error("Invalid User-Agent header")]
    InvalidUserAgent(#[from] http::header::InvalidHeaderValue),

    /// The underlying `reqwest` client could not be created
    #[error("Failed to create request client: {0}")]
    BuildClient(#[source] reqwest::Error),

    /// A pipeline task panicked or was aborted
    #[error("Pipeline task failed: {0}")]
    Runtime(#[from] tokio::task::JoinError),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DomainList(p1, e1), Self::DomainList(p2, e2)) => {
                p1 == p2 && e1.kind() == e2.kind()
            }
            (Self::InvalidArchiveUrl(s1, e1), Self::InvalidArchiveUrl(s2, e2)) => {
                s1 == s2 && e1 == e2
            }
            (Self::InvalidUserAgent(_), Self::InvalidUserAgent(_)) => true,
            (Self::BuildClient(e1), Self::BuildClient(e2)) => e1.to_string() == e2.to_string(),
            _ => false,
        }
    }
}
