//! Resilient fetch layer
//!
//! This module turns a URL into parsed document content:
//! - [`RetryPolicy`]: immutable timeout / retry / backoff settings
//! - [`Fetcher`]: blocking GET with sequential retries
//! - [`ParsedDocument`]: the leniently parsed page tree
//!
//! A failed fetch is never fatal. [`Fetcher::fetch`] returns `None` and logs
//! the cause; callers treat that as "no content available".

mod document;
mod fetcher;
mod policy;

pub use document::ParsedDocument;
pub use fetcher::{build_http_client, fetch, Fetcher};
pub use policy::{
    RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_STATUSES, DEFAULT_TIMEOUT,
};
