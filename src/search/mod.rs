//! Search request construction and result filtering
//!
//! Both are plain string work around the core: [`SearchQuery`] templates the
//! catalog's search URL, and [`filtered`] narrows an extracted record list.

mod filter;
mod query;

pub use filter::{filtered, RecordFilter};
pub use query::{search_categories, search_fields, SearchField, SearchQuery, Topic, DEFAULT_MAX_RESULTS};
