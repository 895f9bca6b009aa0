use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

/// One fetched HTML page, parsed into a navigable tree
///
/// Parsing is lenient: html5ever repairs malformed markup instead of failing,
/// so construction never errors. The tree is never mutated after construction.
pub struct ParsedDocument {
    url: String,
    fetched_at: DateTime<Utc>,
    html: Html,
}

impl ParsedDocument {
    /// Parses a response body fetched from `url`
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            fetched_at: Utc::now(),
            html: Html::parse_document(body),
        }
    }

    /// Parses HTML that did not come from the network
    ///
    /// The source URL is left empty.
    pub fn from_html(body: &str) -> Self {
        Self::parse(String::new(), body)
    }

    /// The URL this document was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// When the response body was parsed
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// All elements matching `selector`, in document order
    pub fn select_all<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.html.select(selector).collect()
    }

    /// The first element matching `selector`
    pub fn select_first<'a>(&'a self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("url", &self.url)
            .field("fetched_at", &self.fetched_at)
            .finish_non_exhaustive()
    }
}
