//! Every message on stdout that is not an archived URL.
//!
//! URLs go through the [`OutputSink`](crate::sink::OutputSink) and are
//! printed in every mode; everything here is muted in silent mode.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use const_format::concatcp;

use crate::formatters::color::{BOLD_PINK, BOLD_YELLOW, DIM, GREEN};
use crate::formatters::summary::RunSummary;

const TITLE: &str = concatcp!(
    "#        WaybackScope URL Collector v",
    env!("CARGO_PKG_VERSION"),
    "        #"
);
const AUTHOR: &str = "#        Developed by @h6nt3r                      #";
const DISCLAIMER: &str = "\
[!] Legal disclaimer: Usage of WaybackScope for attacking targets without prior mutual
    consent is illegal. It is the end user's responsibility to obey all applicable
    local, state and federal laws. Developers assume no liability and are not
    responsible for any misuse or damage caused by this program.";

#[derive(Debug, Clone, Copy)]
pub(crate) struct Reporter {
    silent: bool,
}

impl Reporter {
    pub(crate) const fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub(crate) fn banner(&self) -> io::Result<()> {
        self.print(format_args!(
            "{}\n{}\n\n{}\n",
            GREEN.apply_to(TITLE),
            DIM.apply_to(AUTHOR),
            BOLD_YELLOW.apply_to(DISCLAIMER)
        ))
    }

    /// Guidance shown when no domain was given
    pub(crate) fn usage(&self, help: impl Display) -> io::Result<()> {
        self.print(help)
    }

    /// A setup error that ends the run before anything is fetched
    pub(crate) fn fatal(&self, error: impl Display) -> io::Result<()> {
        self.print(BOLD_PINK.apply_to(format!("Error: {error}")))
    }

    pub(crate) fn saved(&self, total: usize, path: &Path) -> io::Result<()> {
        self.print(GREEN.apply_to(format!(
            "[+] Saved {total} URLs to {}",
            path.display()
        )))
    }

    pub(crate) fn summary(&self, summary: &RunSummary) -> io::Result<()> {
        self.print(summary)
    }

    fn print(&self, message: impl Display) -> io::Result<()> {
        if self.silent {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{message}")?;
        stdout.flush()
    }
}
