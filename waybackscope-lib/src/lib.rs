//! `waybackscope_lib` collects archived URLs for a set of domains from the
//! Wayback Machine CDX index.
//!
//! The pipeline is made of a few small pieces:
//!
//! - [`normalize`] turns raw input lines into bare host names
//! - [`TargetResolver`] picks the input source and builds the [`Target`] list
//! - [`Fetcher`] queries the archive for one target, with retries
//! - [`WorkerPool`] runs many fetchers concurrently and merges their output
//!
//! ```no_run
//! use std::sync::Arc;
//! use waybackscope_lib::{ErrorCounters, FetcherBuilder, Result, Target, WorkerPool};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = FetcherBuilder::default().fetcher()?;
//!     let counters = Arc::new(ErrorCounters::new());
//!     let mut pipeline = WorkerPool::new(fetcher, Arc::clone(&counters))
//!         .workers(5)
//!         .spawn(vec![Target::wildcard("example.com")]);
//!
//!     while let Some(url) = pipeline.recv().await {
//!         println!("{url}");
//!     }
//!     pipeline.finish().await?;
//!     println!("{} errors", counters.total());
//!     Ok(())
//! }
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

mod fetcher;
mod normalize;
mod pool;
mod resolver;
mod types;

pub mod stats;
pub mod waiter;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(feature = "native-tls")]
use openssl_sys as _; // required for vendored-openssl feature

pub use crate::{
    fetcher::{
        DEFAULT_ARCHIVE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_WAIT_TIME_MS,
        DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, Fetcher, FetcherBuilder,
    },
    normalize::normalize,
    pool::{DEFAULT_WORKERS, Pipeline, RESULT_CHANNEL_CAPACITY, WorkerPool},
    resolver::{Resolved, TargetResolver, TargetSource},
    stats::{ErrorClass, ErrorCounters},
    types::{ErrorKind, Outcome, Result, Target},
};
