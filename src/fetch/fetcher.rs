//! HTTP fetcher implementation
//!
//! This module turns a URL into a [`ParsedDocument`]:
//! - Building a blocking HTTP client with a browser-like user agent and timeout
//! - A single GET per attempt
//! - Sequential retries with exponential backoff on transient failures
//! - Lenient HTML parsing of the successful body
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | 2xx | Parse body, return document |
//! | Status in the policy's retry set (429, 5xx by default) | Back off, retry |
//! | Timeout / connection error | Back off, retry |
//! | Any other status or error | Stop immediately |
//! | Attempts exhausted | Surface the last error |

use crate::config::{FetchConfig, DEFAULT_USER_AGENT};
use crate::fetch::document::ParsedDocument;
use crate::fetch::policy::RetryPolicy;
use crate::{MirrorError, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Span};

/// Upper bound on the TCP connect phase, independent of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds a blocking HTTP client for the given policy
///
/// # Example
///
/// ```no_run
/// use catalog_mirror::fetch::{build_http_client, RetryPolicy};
///
/// let client = build_http_client(&RetryPolicy::default(), "Mozilla/5.0").unwrap();
/// ```
pub fn build_http_client(policy: &RetryPolicy, user_agent: &str) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(policy.timeout())
        .connect_timeout(CONNECT_TIMEOUT.min(policy.timeout()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL under `policy`, using a throwaway client
///
/// Returns `None` on any failure; the cause is logged at error level.
pub fn fetch(url: &str, policy: &RetryPolicy) -> Option<ParsedDocument> {
    match Fetcher::new(policy.clone(), DEFAULT_USER_AGENT) {
        Ok(fetcher) => fetcher.fetch(url),
        Err(e) => {
            error!(url, error = %e, "Failed to build HTTP client");
            None
        }
    }
}

/// A retrying page fetcher
///
/// Each instance owns its client, policy and logging span; nothing is shared
/// between instances, so separate fetchers may run on separate threads.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    span: Span,
}

impl Fetcher {
    /// Creates a fetcher with the given policy and User-Agent
    pub fn new(policy: RetryPolicy, user_agent: &str) -> Result<Self> {
        let client = build_http_client(&policy, user_agent)?;
        Ok(Self {
            client,
            policy,
            span: info_span!("fetcher"),
        })
    }

    /// Creates a fetcher from the `[fetch]` configuration section
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::new(RetryPolicy::from(config), &config.user_agent)
    }

    /// Replaces the span all fetch events are recorded under
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches and parses `url`, returning `None` if no content is available
    ///
    /// Failures never propagate; the cause is logged at error level.
    pub fn fetch(&self, url: &str) -> Option<ParsedDocument> {
        self.span.in_scope(|| match self.fetch_with_retries(url) {
            Ok(document) => Some(document),
            Err(e) => {
                error!(url, error = %e, "Fetch failed");
                None
            }
        })
    }

    /// Fetches and parses `url`, returning the final error on failure
    pub fn try_fetch(&self, url: &str) -> Result<ParsedDocument> {
        self.span.in_scope(|| self.fetch_with_retries(url))
    }

    fn fetch_with_retries(&self, url: &str) -> Result<ParsedDocument> {
        let max_attempts = self.policy.max_retries();
        let mut attempt = 1;

        loop {
            debug!(url, attempt, max_attempts, "Sending GET");

            let retry_after = match self.client.get(url).send() {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let final_url = response.url().to_string();
                        let body = response.text().map_err(|e| classify_error(url, e))?;
                        info!(url, status = status.as_u16(), attempt, "Fetched page");
                        return Ok(ParsedDocument::parse(final_url, &body));
                    }

                    if !self.policy.is_retryable(status) || attempt >= max_attempts {
                        return Err(MirrorError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    warn!(url, status = status.as_u16(), attempt, "Transient status, retrying");
                    if self.policy.honors_retry_after(status) {
                        parse_retry_after(response.headers())
                    } else {
                        None
                    }
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if !transient || attempt >= max_attempts {
                        return Err(classify_error(url, e));
                    }

                    warn!(url, attempt, error = %e, "Transient network error, retrying");
                    None
                }
            };

            let delay = self.policy.delay(attempt, retry_after);
            if !delay.is_zero() {
                debug!(url, delay_ms = delay.as_millis() as u64, "Backing off");
                std::thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}

/// Maps a transport error to the crate error type
fn classify_error(url: &str, error: reqwest::Error) -> MirrorError {
    if error.is_timeout() {
        MirrorError::Timeout {
            url: url.to_string(),
        }
    } else {
        MirrorError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Reads `Retry-After` as delta-seconds or an HTTP date
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    (at - Utc::now()).to_std().ok()
}
