//! Decide which domains a run works on.
//!
//! Exactly one input source is used per run. Sources are tried in order of
//! precedence and the first one that yields anything wins:
//!
//! 1. piped standard input (exact targets)
//! 2. a domain list file (wildcard targets)
//! 3. the single-domain options (one wildcard and/or one exact target)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use log::{info, warn};

use crate::{ErrorKind, Result, Target, normalize};

/// Lines starting with this marker are ignored in domain list files
const COMMENT_MARKER: &str = "#";

/// Where the resolved targets came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Non-interactive standard input
    Stdin,
    /// A domain list file
    DomainList(PathBuf),
    /// The single-domain options
    Options,
}

/// Targets of a run together with the source that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Source that won the precedence order
    pub source: TargetSource,
    /// Targets in input order
    pub targets: Vec<Target>,
}

impl Resolved {
    /// Returns `true` if there is nothing to fetch
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Builds the target list from the configured input sources
#[derive(Debug, Default, Clone)]
pub struct TargetResolver {
    domain_list: Option<PathBuf>,
    wildcard: Option<String>,
    exact: Option<String>,
}

impl TargetResolver {
    /// Create a resolver without any configured sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File with one domain per line, queried including subdomains
    #[must_use]
    pub fn domain_list(mut self, path: Option<PathBuf>) -> Self {
        self.domain_list = path;
        self
    }

    /// Single domain queried including subdomains
    #[must_use]
    pub fn wildcard(mut self, domain: Option<String>) -> Self {
        self.wildcard = domain;
        self
    }

    /// Single domain queried without subdomains
    #[must_use]
    pub fn exact(mut self, domain: Option<String>) -> Self {
        self.exact = domain;
        self
    }

    /// Resolve the targets of this run
    ///
    /// `piped` is standard input if it is not an interactive terminal. A pipe
    /// that yields no domains does not count as a source.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainList`] if the domain list file is the
    /// selected source and cannot be opened or read.
    pub fn resolve<R: BufRead>(&self, piped: Option<R>) -> Result<Resolved> {
        if let Some(reader) = piped {
            match read_piped(reader) {
                Ok(targets) if !targets.is_empty() => {
                    info!("Read {} domains from stdin", targets.len());
                    return Ok(Resolved {
                        source: TargetSource::Stdin,
                        targets,
                    });
                }
                Ok(_) => (),
                Err(e) => warn!("Ignoring unreadable stdin: {e}"),
            }
        }

        if let Some(path) = &self.domain_list {
            let file = File::open(path).map_err(|e| ErrorKind::DomainList(path.clone(), e))?;
            let targets = read_domain_list(BufReader::new(file))
                .map_err(|e| ErrorKind::DomainList(path.clone(), e))?;
            info!("Read {} domains from {}", targets.len(), path.display());
            return Ok(Resolved {
                source: TargetSource::DomainList(path.clone()),
                targets,
            });
        }

        let wildcard = self.wildcard.as_deref().map(normalize);
        let exact = self.exact.as_deref().map(normalize);
        let targets = wildcard
            .into_iter()
            .map(Target::wildcard)
            .chain(exact.into_iter().map(Target::exact))
            .filter(|target| !target.name.is_empty())
            .collect();

        Ok(Resolved {
            source: TargetSource::Options,
            targets,
        })
    }
}

/// Lines of `reader`, with invalid UTF-8 replaced instead of rejected
fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<String>> {
    reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}

/// Every non-blank line becomes an exact target
fn read_piped<R: BufRead>(reader: R) -> std::io::Result<Vec<Target>> {
    let mut targets = Vec::new();
    for line in lossy_lines(reader) {
        let name = normalize(&line?);
        if !name.is_empty() {
            targets.push(Target::exact(name));
        }
    }
    Ok(targets)
}

/// Every non-blank, non-comment line becomes a wildcard target
fn read_domain_list<R: BufRead>(reader: R) -> std::io::Result<Vec<Target>> {
    let mut targets = Vec::new();
    for line in lossy_lines(reader) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        let name = normalize(line);
        if !name.is_empty() {
            targets.push(Target::wildcard(name));
        }
    }
    Ok(targets)
}
