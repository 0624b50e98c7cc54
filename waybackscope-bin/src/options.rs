use crate::verbosity::Verbosity;
use anyhow::{Context, Result};
use clap::Parser;
use const_format::{concatcp, formatcp};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use waybackscope_lib::{
    DEFAULT_ARCHIVE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    DEFAULT_WORKERS,
};

pub(crate) const WAYBACKSCOPE_CONFIG_FILE: &str = "waybackscope.toml";

const DEFAULT_DELAY_MS: u64 = 0;

// this exists because clap requires `&str` type values for defaults
// whereas serde expects owned `String` types
const TIMEOUT_STR: &str = concatcp!(DEFAULT_TIMEOUT_SECS);
const WORKERS_STR: &str = concatcp!(DEFAULT_WORKERS);
const RETRIES_STR: &str = concatcp!(DEFAULT_MAX_RETRIES);
const DELAY_MS_STR: &str = concatcp!(DEFAULT_DELAY_MS);
// Show the default config file, but keep the option empty so a missing
// default file is not an error.
const HELP_MSG_CONFIG_FILE: &str = formatcp!(
    "Configuration file to use\n\n[default: {}]",
    WAYBACKSCOPE_CONFIG_FILE,
);

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            #[allow(clippy::missing_const_for_fn)]
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    timeout: u64 = DEFAULT_TIMEOUT_SECS;
    workers: usize = DEFAULT_WORKERS;
    user_agent: String = DEFAULT_USER_AGENT.to_string();
    retries: u64 = DEFAULT_MAX_RETRIES;
    archive_url: String = DEFAULT_ARCHIVE_URL.to_string();
    verbosity: Verbosity = Verbosity::default();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ($cli:ident , $toml:ident ; $ty:ident { $(..$ignore:ident,)* $( $key:ident : $default:expr, )* } ) => {
        if (false) {
            #[allow(dead_code, unused, clippy::diverging_sub_expression)]
            let _check_fold_in_exhaustivity = $ty {
                $($key: unreachable!(), )*
                $($ignore: unreachable!(), )*
            };
        };
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

/// waybackscope collects every archived URL of a set of domains from the
/// Wayback Machine CDX index.
///
/// Domains are read from piped standard input (exact match), a domain list
/// file (including subdomains) or the `--domain`/`--url` options, in this
/// order of precedence.
#[derive(Parser, Debug)]
#[command(version, about, next_display_order = None)]
pub(crate) struct WaybackScopeOptions {
    /// Configuration file to use
    #[arg(short, long = "config")]
    #[arg(help = HELP_MSG_CONFIG_FILE)]
    pub(crate) config_file: Option<PathBuf>,

    #[clap(flatten)]
    pub(crate) config: Config,
}

/// The main configuration for waybackscope
#[derive(Parser, Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Target domain with subdomains (e.g. example.com)
    #[arg(short, long, value_name = "DOMAIN")]
    #[serde(default)]
    pub(crate) domain: Option<String>,

    /// Target domain only, no subdomains (e.g. example.com)
    #[arg(short, long, value_name = "DOMAIN")]
    #[serde(default)]
    pub(crate) url: Option<String>,

    /// File containing a list of domains (one per line)
    #[arg(
        short = 'l',
        long,
        visible_alias = "dl",
        value_name = "PATH",
        long_help = "File containing a list of domains (one per line)

Every domain is queried including its subdomains.
Empty lines and lines starting with '#' are ignored."
    )]
    #[serde(default)]
    pub(crate) domain_list: Option<PathBuf>,

    /// Output file (e.g. result.txt)
    #[arg(short, long, value_name = "PATH")]
    #[serde(default)]
    pub(crate) output: Option<PathBuf>,

    /// Timeout in seconds for each request, 0 disables it
    #[arg(short, long, default_value = TIMEOUT_STR, value_name = "SECONDS")]
    #[serde(default = "timeout")]
    pub(crate) timeout: u64,

    /// Number of concurrent workers
    #[arg(short, long, default_value = WORKERS_STR)]
    #[serde(default = "workers")]
    pub(crate) workers: usize,

    /// Silent mode: print ONLY URLs (no banner, no summary, no other messages)
    #[arg(short, long)]
    #[serde(default)]
    pub(crate) silent: bool,

    /// User-Agent header sent to the archive
    #[arg(short = 'a', long, visible_alias = "ua", default_value = DEFAULT_USER_AGENT)]
    #[serde(default = "user_agent")]
    pub(crate) user_agent: String,

    /// Number of retries per domain on transient errors
    #[arg(short, long, default_value = RETRIES_STR)]
    #[serde(default = "retries")]
    pub(crate) retries: u64,

    /// Delay in milliseconds a worker waits after each domain
    #[arg(long, default_value = DELAY_MS_STR, value_name = "MS")]
    #[serde(default)]
    pub(crate) delay_ms: u64,

    /// CDX endpoint to query, e.g. a mirror of the Wayback Machine index
    #[arg(long, default_value = DEFAULT_ARCHIVE_URL, value_name = "URL")]
    #[serde(default = "archive_url")]
    pub(crate) archive_url: String,

    /// Verbose program output
    #[clap(flatten)]
    #[serde(default = "verbosity")]
    pub(crate) verbose: Verbosity,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        // Read configuration file
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| "Failed to parse configuration file")
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        // NOTE: if you see an error within this macro call, check to make sure that
        // that the fields provided to fold_in! match all the fields of the Config struct.
        fold_in! {
            // Destination and source configs
            self, toml;

            Config {
                // Keys with defaults to assign
                domain: None,
                url: None,
                domain_list: None,
                output: None,
                timeout: DEFAULT_TIMEOUT_SECS,
                workers: DEFAULT_WORKERS,
                silent: false,
                user_agent: DEFAULT_USER_AGENT,
                retries: DEFAULT_MAX_RETRIES,
                delay_ms: DEFAULT_DELAY_MS,
                archive_url: DEFAULT_ARCHIVE_URL,
                verbose: Verbosity::default(),
            }
        }
    }
}
