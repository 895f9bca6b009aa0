use crate::extract::Record;

/// Case-insensitive substring criteria over a record list
///
/// Every supplied criterion must match; empty criteria are ignored, so the
/// default filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub year: Option<String>,
    pub publisher: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    #[must_use]
    pub fn author(mut self, value: impl Into<String>) -> Self {
        self.author = Some(value.into());
        self
    }

    #[must_use]
    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = Some(value.into());
        self
    }

    #[must_use]
    pub fn year(mut self, value: impl Into<String>) -> Self {
        self.year = Some(value.into());
        self
    }

    #[must_use]
    pub fn publisher(mut self, value: impl Into<String>) -> Self {
        self.publisher = Some(value.into());
        self
    }

    /// Returns true if no criterion would restrict anything
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.language,
            &self.year,
            &self.publisher,
        ]
        .iter()
        .all(|criterion| criterion.as_deref().map_or(true, str::is_empty))
    }

    /// Returns true if `record` satisfies every supplied criterion
    pub fn matches(&self, record: &Record) -> bool {
        contains(&record.title, &self.title)
            && contains(&record.author, &self.author)
            && contains(&record.language, &self.language)
            && contains(&record.year, &self.year)
            && contains(&record.publisher, &self.publisher)
    }
}

fn contains(value: &str, criterion: &Option<String>) -> bool {
    match criterion.as_deref() {
        None | Some("") => true,
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Records matching `filter`, in their original order
pub fn filtered(records: &[Record], filter: &RecordFilter) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}
