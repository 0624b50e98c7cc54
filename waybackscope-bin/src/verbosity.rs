//! `-v`/`-q` flags controlling the log level
//!
//! By default only warnings and errors are logged.
//! - `-q` only errors
//! - `-qq` nothing
//! - `-v` info
//! - `-vv` debug
//! - `-vvv` trace

use std::fmt;

use log::{Level, LevelFilter};
use serde::Deserialize;

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Verbosity {
    /// Pass many times for more log output
    ///
    /// By default, it'll only report warnings and errors. Passing `-v` one
    /// time also prints info logs, `-vv` enables debug logging and `-vvv`
    /// trace.
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "More output per occurrence",
        conflicts_with = "quiet",
    )]
    verbose: u8,

    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        help = "Less output per occurrence",
        conflicts_with = "verbose",
    )]
    quiet: u8,
}

impl Verbosity {
    /// Get the log level filter.
    ///
    /// Quieting below errors turns logging off.
    pub(crate) const fn log_level_filter(&self) -> LevelFilter {
        match self.verbosity() {
            i8::MIN..=-1 => LevelFilter::Off,
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    const fn verbosity(&self) -> i8 {
        level_value(Level::Warn)
            .saturating_sub(self.quiet as i8)
            .saturating_add(self.verbose as i8)
    }
}

// Deserialized from a level name like "warn", "warning" or "Info"
impl<'de> Deserialize<'de> for Verbosity {
    #[allow(clippy::cast_sign_loss)]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = match s.to_lowercase().as_str() {
            "off" => -1,
            "error" => level_value(Level::Error),
            "warn" | "warning" => level_value(Level::Warn),
            "info" => level_value(Level::Info),
            "debug" => level_value(Level::Debug),
            "trace" => level_value(Level::Trace),
            level => {
                return Err(serde::de::Error::custom(format!(
                    "invalid log level `{level}`"
                )));
            }
        };
        let offset = value - level_value(Level::Warn);
        Ok(Verbosity {
            verbose: offset.max(0) as u8,
            quiet: (-offset).max(0) as u8,
        })
    }
}

const fn level_value(level: Level) -> i8 {
    match level {
        Level::Error => 0,
        Level::Warn => 1,
        Level::Info => 2,
        Level::Debug => 3,
        Level::Trace => 4,
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log_level_filter())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        verbose: Verbosity,
    }

    fn filter_for(args: &[&str]) -> LevelFilter {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).verbose.log_level_filter()
    }

    #[test]
    fn verify_app() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(Verbosity::default().log_level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_flags() {
        assert_eq!(filter_for(&["-v"]), LevelFilter::Info);
        assert_eq!(filter_for(&["-vv"]), LevelFilter::Debug);
        assert_eq!(filter_for(&["-vvvvv"]), LevelFilter::Trace);
        assert_eq!(filter_for(&["-q"]), LevelFilter::Error);
        assert_eq!(filter_for(&["-qqqq"]), LevelFilter::Off);
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            verbose: Verbosity,
        }
        let level = |s: &str| {
            toml::from_str::<Wrapper>(&format!("verbose = \"{s}\""))
                .unwrap()
                .verbose
                .log_level_filter()
        };

        assert_eq!(level("error"), LevelFilter::Error);
        assert_eq!(level("Warning"), LevelFilter::Warn);
        assert_eq!(level("debug"), LevelFilter::Debug);
        assert_eq!(level("off"), LevelFilter::Off);
        assert!(toml::from_str::<Wrapper>("verbose = \"loud\"").is_err());
    }
}
