use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::io::Write;

use crate::{formatters, verbosity::Verbosity};

/// Initialize the logging system with the given verbosity level.
///
/// Logs go to stderr so they never mix with the URLs on stdout. In silent
/// mode logging is turned off entirely.
pub(crate) fn init_logging(verbose: &Verbosity, silent: bool) {
    // Set a base level for all modules to `warn`.
    // It will be overridden by RUST_LOG if it's set.
    let env = Env::default().filter_or("RUST_LOG", "warn");

    let mut builder = Builder::from_env(env);
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if silent {
        builder.filter_level(LevelFilter::Off);
    } else if std::env::var("RUST_LOG").is_err() {
        let level_filter = verbose.log_level_filter();

        // Keep dependencies (hyper, reqwest, ...) quiet unless RUST_LOG asks
        // for them, and apply the CLI verbosity to our own crates.
        builder.filter_level(LevelFilter::Warn.min(level_filter));
        builder
            .filter_module("waybackscope", level_filter)
            .filter_module("waybackscope_lib", level_filter);
    }

    builder.format(move |buf, record| {
        let level = record.level();
        let color = formatters::color::color_for_level(level);
        writeln!(
            buf,
            "{} {}",
            color.apply_to(format!("[{level}]")),
            record.args()
        )
    });

    builder.init();
}
