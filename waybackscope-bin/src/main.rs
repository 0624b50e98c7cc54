//! `waybackscope` collects every URL the Wayback Machine has archived for a
//! set of domains.
//!
//! The waybackscope binary is a wrapper around waybackscope-lib, which does
//! the actual fetching.
//!
//! Collect the URLs of a domain and all its subdomains:
//! ```sh
//! waybackscope -d example.com
//! ```
//!
//! Collect the URLs of a single host and save them to a file:
//! ```sh
//! waybackscope -u www.example.com -o result.txt
//! ```
//!
//! Read domains from a file, with more workers and a pause between domains:
//! ```sh
//! waybackscope -l domains.txt -w 10 --delay-ms 500
//! ```
//!
//! Pipe domains in and print nothing but URLs:
//! ```sh
//! cat hosts.txt | waybackscope -s | sort -u
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    rustdoc::invalid_html_tags,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    variant_size_differences,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]
#![deny(missing_docs)]

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Error, Result, bail};
use clap::{CommandFactory, Parser};
use formatters::log::init_logging;
use log::{error, info};

#[cfg(feature = "native-tls")]
use openssl_sys as _; // required for vendored-openssl feature

use waybackscope_lib::{ErrorCounters, FetcherBuilder, TargetResolver, WorkerPool};

mod formatters;
mod options;
mod reporter;
mod sink;
mod verbosity;

use crate::{
    formatters::summary::RunSummary,
    options::{Config, WAYBACKSCOPE_CONFIG_FILE, WaybackScopeOptions},
    reporter::Reporter,
    sink::OutputSink,
};

/// A C-like enum that can be cast to `i32` and used as process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    ConfigFile = 3,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be run,
    // therefore we wrap the main code in another function to ensure that.
    // See: https://doc.rust-lang.org/stable/std/process/fn.exit.html
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

/// Merge a potential config file into the options from the command line
fn load_config(opts: &mut WaybackScopeOptions) -> Result<()> {
    if let Some(config_file) = &opts.config_file {
        match Config::load_from_file(config_file) {
            Ok(c) => opts.config.merge(c),
            Err(e) => {
                bail!(
                    "Cannot load configuration file `{}`: {e:?}",
                    config_file.display()
                );
            }
        }
    } else {
        // Only an existing default config file is loaded, but an invalid one
        // is an error just like an explicitly provided one.
        let default_config = PathBuf::from(WAYBACKSCOPE_CONFIG_FILE);
        if default_config.is_file() {
            match Config::load_from_file(&default_config) {
                Ok(c) => opts.config.merge(c),
                Err(e) => {
                    bail!(
                        "Cannot load default configuration file `{}`: {e:?}",
                        default_config.display()
                    );
                }
            }
        }
    }
    Ok(())
}

/// Set up runtime and call waybackscope entrypoint
fn run_main() -> Result<i32> {
    use std::process::exit;

    let mut opts = WaybackScopeOptions::parse();
    let loaded = load_config(&mut opts);
    init_logging(&opts.config.verbose, opts.config.silent);

    if let Err(e) = loaded {
        error!("Error while loading config: {e}");
        exit(ExitCode::ConfigFile as i32);
    }

    let runtime = tokio::runtime::Runtime::new()?;

    match runtime.block_on(run(&opts.config)) {
        Err(e) if Some(io::ErrorKind::BrokenPipe) == underlying_io_error_kind(&e) => {
            exit(ExitCode::Success as i32);
        }
        res => res,
    }
}

/// Check if the given error can be traced back to an `io::ErrorKind`
/// This is helpful for troubleshooting the root cause of an error.
/// Code is taken from the anyhow documentation.
fn underlying_io_error_kind(error: &Error) -> Option<io::ErrorKind> {
    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
    }
    None
}

/// Run waybackscope with the given configuration
async fn run(cfg: &Config) -> Result<i32> {
    let reporter = Reporter::new(cfg.silent);
    reporter.banner()?;

    let resolver = TargetResolver::new()
        .domain_list(cfg.domain_list.clone())
        .wildcard(cfg.domain.clone())
        .exact(cfg.url.clone());

    let stdin = io::stdin();
    let piped = (!stdin.is_terminal()).then(|| stdin.lock());
    let resolved = match resolver.resolve(piped) {
        Ok(resolved) => resolved,
        Err(e) => {
            reporter.fatal(e)?;
            return Ok(ExitCode::Success as i32);
        }
    };

    if resolved.is_empty() {
        reporter.usage(WaybackScopeOptions::command().render_help())?;
        return Ok(ExitCode::Success as i32);
    }
    info!(
        "Fetching {} targets from {:?}",
        resolved.targets.len(),
        resolved.source
    );

    let file = match &cfg.output {
        Some(path) => match File::create(path) {
            Ok(file) => Some((path.clone(), file)),
            Err(e) => {
                reporter.fatal(format_args!(
                    "Cannot create output file `{}`: {e}",
                    path.display()
                ))?;
                return Ok(ExitCode::Success as i32);
            }
        },
        None => None,
    };

    let fetcher = FetcherBuilder::builder()
        .archive_url(cfg.archive_url.clone())
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_secs(cfg.timeout))
        .max_retries(cfg.retries)
        .build()
        .fetcher()
        .context("Failed to create archive client")?;

    let counters = Arc::new(ErrorCounters::new());
    let start = Instant::now();

    let mut pipeline = WorkerPool::new(fetcher, Arc::clone(&counters))
        .workers(cfg.workers)
        .delay(Duration::from_millis(cfg.delay_ms))
        .spawn(resolved.targets);

    let mut sink = OutputSink::new(io::stdout(), file);
    let total = sink.drain(&mut pipeline).await?;
    let saved_to = sink.finish()?;
    pipeline.finish().await?;

    if let Some(path) = saved_to {
        reporter.saved(total, &path)?;
    }
    reporter.summary(&RunSummary::new(start.elapsed(), &counters))?;

    Ok(ExitCode::Success as i32)
}
