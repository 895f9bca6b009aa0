//! Structured extraction over parsed catalog pages
//!
//! This module contains:
//! - [`MetadataExtractor`]: result table → ordered, bounded [`Record`] list
//! - [`LinkResolver`]: download page → single outbound link
//! - [`NodeQuery`]: the query-or-default accessors both are written against

mod metadata;
mod query;
mod record;
mod resolver;

pub use metadata::MetadataExtractor;
pub use query::{compile, NodeQuery};
pub use record::Record;
pub use resolver::LinkResolver;
