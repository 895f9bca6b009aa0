use serde::Serialize;

/// One normalized catalog entry
///
/// Every field is always present. Values the page did not provide are empty
/// strings or empty lists, never missing. `year`, `pages` and `size` are kept
/// as the page printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: String,
    pub language: String,
    pub pages: String,
    pub size: String,
    pub format: String,
    pub thumbnail: String,
    pub isbn: Vec<String>,
    pub id: String,
    pub content_url: Vec<String>,
}
