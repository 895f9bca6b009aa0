//! Download-page link resolution
//!
//! A download page from either mirror lists its direct link as the first
//! anchor of its first table. The primary mirror emits site-relative hrefs,
//! while secondary mirrors already emit absolute ones.

use crate::config::MirrorConfig;
use crate::extract::query::{compile, NodeQuery};
use crate::fetch::ParsedDocument;
use crate::url::{mentions_host, mirror_host, prefix_base};
use crate::Result;
use scraper::Selector;
use tracing::{debug, info_span, Span};

/// Extracts single outbound links from secondary pages
pub struct LinkResolver {
    table: Selector,
    anchor: Selector,
    anchor_with_href: Selector,
    nav_tabs: Selector,
    base_url: String,
    primary_host: String,
    secondary_hosts: Vec<String>,
    span: Span,
}

impl LinkResolver {
    /// Creates a resolver for the given mirror layout
    ///
    /// Fails if the base URL has no usable host.
    pub fn new(mirror: &MirrorConfig) -> Result<Self> {
        Ok(Self {
            table: compile("table")?,
            anchor: compile("a")?,
            anchor_with_href: compile("a[href]")?,
            nav_tabs: compile("ul.nav.nav-tabs")?,
            base_url: mirror.base_url.clone(),
            primary_host: mirror_host(&mirror.base_url)?,
            secondary_hosts: mirror.secondary_hosts.clone(),
            span: info_span!("resolver"),
        })
    }

    /// Replaces the span resolution events are recorded under
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }

    /// Resolves the outbound link of a download page
    ///
    /// `source_hint` is the URL (or host) the page was fetched from. For the
    /// primary mirror the href is prefixed with the base URL; for a secondary
    /// mirror it is returned verbatim. An anchor without an href gives
    /// `Some("")`. No table, no anchor, or an unknown host gives `None`.
    pub fn resolve_link(&self, doc: &ParsedDocument, source_hint: &str) -> Option<String> {
        let _entered = self.span.enter();

        let Some(anchor) = doc.select_first(&self.table).first(&self.anchor) else {
            debug!(source_hint, "No link table on download page");
            return None;
        };
        let href = anchor.attr_or_default("href");

        if mentions_host(source_hint, &self.primary_host) {
            if href.is_empty() {
                return Some(href);
            }
            Some(prefix_base(&self.base_url, &href))
        } else if self
            .secondary_hosts
            .iter()
            .any(|host| mentions_host(source_hint, host))
        {
            Some(href)
        } else {
            debug!(source_hint, "Source is not a known mirror");
            None
        }
    }

    /// Finds the supplementary (JSON) link in the page's tab navigation
    ///
    /// Returns the base-prefixed href of the last anchor in `ul.nav.nav-tabs`,
    /// or `None` if the page has no such list or it holds no links.
    pub fn find_supplementary_link(&self, doc: &ParsedDocument) -> Option<String> {
        let _entered = self.span.enter();

        let nav = doc.select_first(&self.nav_tabs)?;
        let last = nav.all(&self.anchor_with_href).last().copied()?;
        let href = last.attr_or_default("href");
        debug!(href = %href, "Found supplementary link");
        Some(prefix_base(&self.base_url, &href))
    }
}
