//! Fallible tree queries with a single fallback rule
//!
//! Every lookup into an untrusted page may miss. [`NodeQuery`] is implemented
//! both for an element and for an optional element, so chains like
//! `cell.first(&img).attr_or_default("src")` read straight through and yield
//! an empty value wherever the expected node is absent.

use crate::{MirrorError, Result};
use scraper::{ElementRef, Selector};

/// Compiles a CSS selector, mapping parse failures to [`MirrorError::Selector`]
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MirrorError::selector(css, format!("{e:?}")))
}

/// Query-or-default accessors over a (possibly absent) element
pub trait NodeQuery<'a> {
    /// First descendant matching `selector`
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>>;

    /// All descendants matching `selector`, in document order
    fn all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;

    /// Concatenated descendant text, trimmed; empty when absent
    fn trimmed_text(&self) -> String;

    /// Attribute value of this element; empty when absent
    fn attr_or_default(&self, name: &str) -> String;

    /// Trimmed text of the first descendant matching `selector`
    fn text_or_default(&self, selector: &Selector) -> String {
        self.first(selector).trimmed_text()
    }
}

impl<'a> NodeQuery<'a> for ElementRef<'a> {
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }

    fn trimmed_text(&self) -> String {
        self.text().collect::<String>().trim().to_string()
    }

    fn attr_or_default(&self, name: &str) -> String {
        self.value().attr(name).unwrap_or_default().to_string()
    }
}

impl<'a> NodeQuery<'a> for Option<ElementRef<'a>> {
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.and_then(|element| element.first(selector))
    }

    fn all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.map(|element| element.all(selector)).unwrap_or_default()
    }

    fn trimmed_text(&self) -> String {
        self.map(|element| element.trimmed_text()).unwrap_or_default()
    }

    fn attr_or_default(&self, name: &str) -> String {
        self.map(|element| element.attr_or_default(name))
            .unwrap_or_default()
    }
}
