//! Retry and timeout policy for the fetcher

use crate::config::FetchConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum number of attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff factor, in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.0;

/// Default cap for a single backoff wait (120 seconds).
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Statuses retried by default.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Immutable timeout and retry configuration for one [`Fetcher`](super::Fetcher)
///
/// # Delay Calculation
///
/// ```text
/// delay(n) = min(backoff_factor * 2^(n-1), max_backoff)
/// ```
///
/// where `n` is the attempt that just failed (1-indexed). With defaults the
/// waits are 1s then 2s before the third and final attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    timeout: Duration,
    max_retries: u32,
    backoff_factor: f64,
    max_backoff: Duration,
    retry_statuses: Vec<u16>,
    respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: DEFAULT_MAX_BACKOFF,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            respect_retry_after: true,
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries.max(1),
            backoff_factor: config.backoff_factor.max(0.0),
            max_backoff: Duration::from_secs(config.max_backoff_secs),
            retry_statuses: config.retry_statuses.clone(),
            respect_retry_after: config.respect_retry_after,
        }
    }
}

impl RetryPolicy {
    /// Returns a copy with a different timeout
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Returns a copy with a different attempt limit (at least 1)
    #[must_use]
    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..self
        }
    }

    /// Returns a copy with a different backoff factor (negative values clamp to 0)
    #[must_use]
    pub fn with_backoff_factor(self, backoff_factor: f64) -> Self {
        Self {
            backoff_factor: backoff_factor.max(0.0),
            ..self
        }
    }

    /// Returns a copy with a different set of retryable statuses
    #[must_use]
    pub fn with_retry_statuses(self, statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            retry_statuses: statuses.into_iter().collect(),
            ..self
        }
    }

    /// Returns a copy that honors or ignores `Retry-After`
    #[must_use]
    pub fn with_respect_retry_after(self, respect_retry_after: bool) -> Self {
        Self {
            respect_retry_after,
            ..self
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn retry_statuses(&self) -> &[u16] {
        &self.retry_statuses
    }

    /// Returns true if a response with this status should be retried
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// Returns true if `Retry-After` applies to this status
    pub fn honors_retry_after(&self, status: StatusCode) -> bool {
        self.respect_retry_after
            && matches!(
                status,
                StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
            )
    }

    /// Backoff before the next attempt, given the 1-indexed attempt that just failed
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
    }

    /// Backoff combined with a server-provided `Retry-After`, still capped
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(attempt);
        match retry_after {
            Some(wait) => backoff.max(wait).min(self.max_backoff),
            None => backoff,
        }
    }
}
