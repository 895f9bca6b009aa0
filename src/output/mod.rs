//! Output module for rendering extracted records
//!
//! This module handles:
//! - Rendering record lists as Markdown tables or JSON
//! - Writing the rendering to stdout or to a file

mod markdown;
mod traits;

pub use markdown::format_markdown_table;
pub use traits::{OutputError, OutputFormat, OutputResult};

use crate::extract::Record;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Renders records in the requested format
pub fn render(records: &[Record], format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Markdown => Ok(format_markdown_table(records)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Writes rendered records to `path`, or to stdout when no path is given
pub fn write_records(records: &[Record], format: OutputFormat, path: Option<&Path>) -> OutputResult<()> {
    let rendered = render(records, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
