//! Catalog mirror facade
//!
//! [`Mirror`] wires one fetcher, extractor and resolver to a single mirror
//! configuration. It holds no per-request state: every operation takes the
//! document or URL it works on and hands its result back to the caller.
//!
//! # Example
//!
//! ```no_run
//! use catalog_mirror::{Mirror, RecordFilter, SearchQuery};
//!
//! let mirror = Mirror::with_defaults().unwrap();
//! let page = mirror.search(&SearchQuery::new("Python Programming").with_max_results(25));
//! let records = mirror.get_metadata(page.as_ref(), 5).unwrap_or_default();
//! let english = Mirror::filtered(&records, &RecordFilter::new().language("English"));
//! ```

use crate::config::{validate, Config};
use crate::extract::{LinkResolver, MetadataExtractor, Record};
use crate::fetch::{Fetcher, ParsedDocument};
use crate::search::{self, RecordFilter, SearchField, SearchQuery, Topic};
use crate::Result;
use tracing::{info, info_span, warn, Span};

/// Default cap on records returned by [`Mirror::get_metadata`] callers
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Convenience surface over the fetch, extraction and resolution layers
pub struct Mirror {
    config: Config,
    fetcher: Fetcher,
    extractor: MetadataExtractor,
    resolver: LinkResolver,
    span: Span,
}

impl Mirror {
    /// Creates a mirror client from a configuration
    ///
    /// The configuration is validated first.
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;

        let span = info_span!("mirror", base_url = %config.mirror.base_url);
        let fetcher = Fetcher::from_config(&config.fetch)?
            .with_span(info_span!(parent: &span, "fetcher"));
        let extractor = MetadataExtractor::new(&config.mirror)?
            .with_span(info_span!(parent: &span, "extractor"));
        let resolver = LinkResolver::new(&config.mirror)?
            .with_span(info_span!(parent: &span, "resolver"));

        Ok(Self {
            config,
            fetcher,
            extractor,
            resolver,
            span,
        })
    }

    /// Creates a mirror client for the default mirror and fetch policy
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.mirror.base_url
    }

    /// The search URL this mirror would fetch for `query`
    pub fn search_url(&self, query: &SearchQuery) -> String {
        query.to_url(self.base_url())
    }

    /// Fetches the result page for `query`
    ///
    /// Returns `None` when the page could not be retrieved.
    pub fn search(&self, query: &SearchQuery) -> Option<ParsedDocument> {
        let url = self.search_url(query);
        self.span.in_scope(|| info!(query = %query.query, page = query.page, "Searching catalog"));
        self.fetch(&url)
    }

    /// Fetches and parses an arbitrary page with this mirror's policy
    pub fn fetch(&self, url: &str) -> Option<ParsedDocument> {
        let document = self.fetcher.fetch(url);
        if document.is_none() {
            self.span
                .in_scope(|| warn!(url, "No content available"));
        }
        document
    }

    /// Extracts up to `max_entries` records from a result page
    ///
    /// Returns `None` (with a warning) when there is no document, and an empty
    /// list when the page has no results.
    pub fn get_metadata(&self, document: Option<&ParsedDocument>, max_entries: usize) -> Option<Vec<Record>> {
        match document {
            Some(document) => Some(self.extractor.extract(document, max_entries)),
            None => {
                self.span.in_scope(|| {
                    warn!("No document available; run a search first")
                });
                None
            }
        }
    }

    /// Finds the supplementary JSON link on a result page
    pub fn get_json(&self, document: Option<&ParsedDocument>) -> Option<String> {
        self.resolver.find_supplementary_link(document?)
    }

    /// Fetches a download page and resolves its direct link
    ///
    /// Returns `None` if the page could not be fetched or holds no link.
    pub fn resolve_download(&self, url: &str) -> Option<String> {
        let document = self.fetch(url)?;
        self.resolver.resolve_link(&document, url)
    }

    /// Searches and extracts in one step; any failure yields an empty list
    pub fn search_metadata(&self, query: &SearchQuery, max_entries: usize) -> Vec<Record> {
        let document = self.search(query);
        self.get_metadata(document.as_ref(), max_entries)
            .unwrap_or_default()
    }

    /// Field filter parameters, see [`search::search_fields`]
    pub fn search_fields(fields: &[SearchField]) -> Vec<String> {
        search::search_fields(fields)
    }

    /// Topic filter parameters, see [`search::search_categories`]
    pub fn search_categories(topics: &[Topic]) -> Vec<String> {
        search::search_categories(topics)
    }

    /// Records matching `filter`, see [`search::filtered`]
    pub fn filtered(records: &[Record], filter: &RecordFilter) -> Vec<Record> {
        search::filtered(records, filter)
    }
}
