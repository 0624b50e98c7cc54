use std::fmt::{self, Display};

/// A single domain to look up in the archive index
///
/// `name` is expected to be normalized already (see
/// [`normalize`](crate::normalize)).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Host to query, without scheme or trailing slash
    pub name: String,
    /// Query only this exact host instead of the host and all its subdomains
    pub exact: bool,
}

impl Target {
    /// Create a target that matches only the given host
    #[must_use]
    pub fn exact<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            exact: true,
        }
    }

    /// Create a target that matches the given host and all its subdomains
    #[must_use]
    pub fn wildcard<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            exact: false,
        }
    }

    /// The URL pattern handed to the CDX `url` parameter
    #[must_use]
    pub fn url_pattern(&self) -> String {
        if self.exact {
            format!("{}/*", self.name)
        } else {
            format!("*.{}/*", self.name)
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{}", self.name)
        } else {
            write!(f, "*.{}", self.name)
        }
    }
}
