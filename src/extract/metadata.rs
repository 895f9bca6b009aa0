//! Search-result table extraction
//!
//! A result page carries at least three tables; the second one holds one row
//! per catalog entry with ten positional cells:
//!
//! | Cell | Content |
//! |------|---------|
//! | 0 | thumbnail `<img>` |
//! | 1 | title block: anchors, optional `<b>` series, badge id, ISBN anchors |
//! | 2..=8 | author, publisher, year, language, pages, size, format |
//! | 9 | download-page links |
//!
//! Missing cells or sub-elements produce empty fields; a row is never dropped
//! for being incomplete.

use crate::config::MirrorConfig;
use crate::extract::query::{compile, NodeQuery};
use crate::extract::record::Record;
use crate::fetch::ParsedDocument;
use crate::url::prefix_base;
use crate::Result;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, info, info_span, Span};

/// Minimum number of tables on a page that has results
const MIN_RESULT_TABLES: usize = 3;

/// Index of the content table among all tables on the page
const CONTENT_TABLE: usize = 1;

/// Marker the catalog appends to reduced-size cover images
const SMALL_THUMBNAIL_MARKER: &str = "_small";

/// 9 to 13 digit identifiers, optionally a `;`-separated group of them
const ISBN_PATTERN: &str = r"\b\d{9,13}(?:;\s*\d{9,13})*\b";

struct Selectors {
    table: Selector,
    row: Selector,
    cell: Selector,
    img: Selector,
    anchor: Selector,
    anchor_with_href: Selector,
    bold: Selector,
    badge: Selector,
}

impl Selectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            table: compile("table")?,
            row: compile("tr")?,
            cell: compile("td")?,
            img: compile("img")?,
            anchor: compile("a")?,
            anchor_with_href: compile("a[href]")?,
            bold: compile("b")?,
            badge: compile("span.badge.badge-secondary")?,
        })
    }
}

/// Extracts [`Record`]s from a catalog result page
///
/// The extractor holds only compiled selectors, patterns and mirror settings,
/// so repeated calls on the same document return identical output.
pub struct MetadataExtractor {
    selectors: Selectors,
    isbn_pattern: Regex,
    whitespace_run: Regex,
    base_url: String,
    link_markers: Vec<String>,
    span: Span,
}

impl MetadataExtractor {
    /// Creates an extractor for the given mirror layout
    pub fn new(mirror: &MirrorConfig) -> Result<Self> {
        Ok(Self {
            selectors: Selectors::compile()?,
            isbn_pattern: Regex::new(ISBN_PATTERN)?,
            whitespace_run: Regex::new(r"\s{2,}")?,
            base_url: mirror.base_url.clone(),
            link_markers: mirror.link_markers.clone(),
            span: info_span!("extractor"),
        })
    }

    /// Replaces the span extraction events are recorded under
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }

    /// Extracts at most `max_entries` records, in page row order
    ///
    /// A page with fewer than three tables has no results and yields an empty
    /// list. Rows without `<td>` cells (headers, separators) are skipped.
    pub fn extract(&self, doc: &ParsedDocument, max_entries: usize) -> Vec<Record> {
        self.span.in_scope(|| {
            let tables = doc.select_all(&self.selectors.table);
            if tables.len() < MIN_RESULT_TABLES {
                info!(url = doc.url(), tables = tables.len(), "Results not found");
                return Vec::new();
            }

            let records: Vec<Record> = tables[CONTENT_TABLE]
                .all(&self.selectors.row)
                .into_iter()
                .filter_map(|row| {
                    let cells = row.all(&self.selectors.cell);
                    if cells.is_empty() {
                        None
                    } else {
                        Some(self.extract_row(&cells))
                    }
                })
                .take(max_entries)
                .collect();

            debug!(url = doc.url(), records = records.len(), max_entries, "Extracted records");
            records
        })
    }

    fn extract_row(&self, cells: &[ElementRef<'_>]) -> Record {
        let cell = |index: usize| cells.get(index).copied();
        let (title, isbn) = self.title_and_isbn(cell(1));

        Record {
            title,
            author: cell(2).trimmed_text(),
            publisher: cell(3).trimmed_text(),
            year: cell(4).trimmed_text(),
            language: cell(5).trimmed_text(),
            pages: cell(6).trimmed_text(),
            size: cell(7).trimmed_text(),
            format: cell(8).trimmed_text(),
            thumbnail: self.thumbnail(cell(0)),
            isbn,
            id: self.badge_id(cell(1)),
            content_url: self.content_urls(cell(9)),
        }
    }

    fn thumbnail(&self, cell: Option<ElementRef<'_>>) -> String {
        let src = cell.first(&self.selectors.img).attr_or_default("src");
        if src.is_empty() {
            return String::new();
        }
        prefix_base(&self.base_url, &src.replace(SMALL_THUMBNAIL_MARKER, ""))
    }

    /// Splits the anchors of the title cell into title fragments and ISBN groups
    fn title_and_isbn(&self, cell: Option<ElementRef<'_>>) -> (String, Vec<String>) {
        let (isbn_groups, fragments): (Vec<String>, Vec<String>) = cell
            .all(&self.selectors.anchor)
            .iter()
            .map(|anchor| anchor.trimmed_text())
            .filter(|text| text.chars().count() > 1)
            .partition(|text| self.isbn_pattern.is_match(text));

        let mut title = fragments.join(" ");
        let series = cell.text_or_default(&self.selectors.bold);
        if !series.is_empty() {
            title = format!("{} - {}", series, title);
        }
        let title = self
            .whitespace_run
            .replace_all(title.trim(), " ")
            .into_owned();

        let isbn: Vec<String> = isbn_groups
            .first()
            .map(|group| group.split(';').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        (title, isbn)
    }

    fn badge_id(&self, cell: Option<ElementRef<'_>>) -> String {
        cell.text_or_default(&self.selectors.badge)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    /// Collects download-page candidates; only the first one is made absolute
    fn content_urls(&self, cell: Option<ElementRef<'_>>) -> Vec<String> {
        let mut urls: Vec<String> = cell
            .all(&self.selectors.anchor_with_href)
            .iter()
            .map(|anchor| anchor.attr_or_default("href"))
            .filter(|href| {
                href.starts_with('/')
                    || self
                        .link_markers
                        .iter()
                        .any(|marker| href.contains(marker.as_str()))
            })
            .collect();

        if let Some(first) = urls.first_mut() {
            if first.starts_with('/') {
                *first = prefix_base(&self.base_url, first);
            }
        }
        urls
    }
}
