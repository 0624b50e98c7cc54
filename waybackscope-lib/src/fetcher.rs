//! Query the archive index for a single target.
//!
//! This module defines two structs, [`Fetcher`] and [`FetcherBuilder`].
//! `Fetcher` performs the requests and streams the result lines into a
//! channel; `FetcherBuilder` exposes its settings.
#![allow(clippy::module_name_repetitions)]
use std::time::Duration;

use http::header::{self, HeaderMap, HeaderValue};
use log::{debug, warn};
use reqwest::Url;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use typed_builder::TypedBuilder;

use crate::{
    ErrorKind, Outcome, Result, Target,
    stats::{ErrorClass, ErrorCounters},
};

/// Default CDX endpoint of the Wayback Machine.
pub const DEFAULT_ARCHIVE_URL: &str = "https://web.archive.org/cdx/search/cdx";
/// Default number of retries per target on transient errors, 2.
pub const DEFAULT_MAX_RETRIES: u64 = 2;
/// Default base wait time between retries in milliseconds, 500.
pub const DEFAULT_RETRY_WAIT_TIME_MS: u64 = 500;
/// Default timeout in seconds for a whole request, 10.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = "WaybackScope/1.0 (@h6nt3r)";

/// Query parameters asking for deduplicated, plain-text, URL-only output
const CDX_PARAMS: &str = "collapse=urlkey&output=text&fl=original";

// Constants currently not configurable by the user.
/// Maximum idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 100;
/// How long idle connections are kept around.
const POOL_IDLE_TIMEOUT: u64 = 30;

/// Builder for [`Fetcher`].
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(setter(into)))]
#[builder(builder_method(doc = "
Create a builder for building `FetcherBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `FetcherBuilder`.
"))]
pub struct FetcherBuilder {
    /// CDX endpoint that is queried for every target
    #[builder(default = DEFAULT_ARCHIVE_URL.to_string())]
    archive_url: String,

    /// User-agent used for every request
    #[builder(default = DEFAULT_USER_AGENT.to_string())]
    user_agent: String,

    /// Limit for a whole request, from connecting until the body is read
    ///
    /// A zero duration disables the limit.
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    timeout: Duration,

    /// Number of retries after the first attempt failed
    #[builder(default = DEFAULT_MAX_RETRIES)]
    max_retries: u64,

    /// Base wait time between retries
    ///
    /// The wait is multiplied by the number of the failed attempt, i.e. it
    /// grows linearly.
    #[builder(default = Duration::from_millis(DEFAULT_RETRY_WAIT_TIME_MS))]
    retry_wait_time: Duration,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FetcherBuilder {
    /// Instantiates a [`Fetcher`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The archive endpoint is not a valid URL.
    /// - The user-agent is not a valid header value.
    /// - The request client cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn fetcher(self) -> Result<Fetcher> {
        let archive_url = Url::parse(&self.archive_url)
            .map_err(|e| ErrorKind::InvalidArchiveUrl(self.archive_url.clone(), e))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        let mut builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT));
        if !self.timeout.is_zero() {
            builder = builder.timeout(self.timeout);
        }
        let client = builder.build().map_err(ErrorKind::BuildClient)?;

        Ok(Fetcher {
            client,
            archive_url,
            max_retries: self.max_retries,
            retry_wait_time: self.retry_wait_time,
        })
    }
}

/// Fetches archived URLs for targets, one request per target
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    archive_url: Url,
    max_retries: u64,
    retry_wait_time: Duration,
}

impl Fetcher {
    /// The archive query for the given target
    #[must_use]
    pub fn query_url(&self, target: &Target) -> Url {
        let mut url = self.archive_url.clone();
        url.set_query(Some(&format!("url={}&{CDX_PARAMS}", target.url_pattern())));
        url
    }

    /// Fetch all archived URLs of `target` and send them to `sender`
    ///
    /// Transport failures are counted in `counters` and retried up to the
    /// configured limit, waiting a little longer after each failed attempt.
    /// After the last failed attempt the target is given up silently.
    /// A response is never retried, whatever its status code: the body is
    /// streamed line by line as it arrives. If reading the body fails halfway,
    /// the error is counted and the lines sent so far stand.
    pub async fn fetch(
        &self,
        target: &Target,
        sender: &Sender<String>,
        counters: &ErrorCounters,
    ) -> Outcome {
        let url = self.query_url(target);

        let mut attempt: u64 = 0;
        let response = loop {
            let request = match self.client.get(url.clone()).build() {
                Ok(request) => request,
                Err(e) => {
                    debug!("Cannot build request for {target}: {e}");
                    counters.record(ErrorClass::Other);
                    return Outcome::Abandoned {
                        attempts: attempt + 1,
                    };
                }
            };
            attempt += 1;

            match self.client.execute(request).await {
                Ok(response) => break response,
                Err(e) => {
                    counters.record(ErrorClass::from(&e));
                    debug!("Attempt {attempt} for {target} failed: {e}");
                    if attempt > self.max_retries {
                        return Outcome::Abandoned { attempts: attempt };
                    }
                    sleep(self.backoff(attempt)).await;
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Archive answered {status} for {target}; streaming the body as-is");
        }

        stream_lines(response, sender, counters).await
    }

    /// Wait time before retrying after the given failed attempt
    fn backoff(&self, attempt: u64) -> Duration {
        self.retry_wait_time
            .saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
    }
}

/// Send every non-blank line of the body as soon as it is complete
async fn stream_lines(
    mut response: reqwest::Response,
    sender: &Sender<String>,
    counters: &ErrorCounters,
) -> Outcome {
    let mut buffer: Vec<u8> = Vec::new();
    let mut lines = 0;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                // Bytes before `scanned` are known to contain no newline
                let scanned = buffer.len();
                buffer.extend_from_slice(&chunk);

                let mut start = 0;
                let mut from = scanned;
                while let Some(offset) = buffer[from..].iter().position(|&b| b == b'\n') {
                    let end = from + offset;
                    match emit(&buffer[start..end], sender).await {
                        Emitted::Line => lines += 1,
                        Emitted::Blank => (),
                        Emitted::Closed => return Outcome::Truncated { lines },
                    }
                    start = end + 1;
                    from = start;
                }
                buffer.drain(..start);
            }
            Ok(None) => {
                // The final line may lack a trailing newline
                return match emit(&buffer, sender).await {
                    Emitted::Line => Outcome::Completed { lines: lines + 1 },
                    Emitted::Blank => Outcome::Completed { lines },
                    Emitted::Closed => Outcome::Truncated { lines },
                };
            }
            Err(e) => {
                debug!("Reading response body failed: {e}");
                counters.record(ErrorClass::Other);
                return Outcome::Truncated { lines };
            }
        }
    }
}

enum Emitted {
    Line,
    Blank,
    /// The receiving end of the channel is gone
    Closed,
}

async fn emit(raw: &[u8], sender: &Sender<String>) -> Emitted {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        return Emitted::Blank;
    }
    match sender.send(line.to_string()).await {
        Ok(()) => Emitted::Line,
        Err(_) => Emitted::Closed,
    }
}
