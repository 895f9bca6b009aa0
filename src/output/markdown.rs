//! Markdown table rendering
//!
//! Renders extracted records as a human-readable table, one row per record.

use crate::extract::Record;

/// Formats records as a Markdown table
///
/// Multi-value fields (ISBNs, download links) are joined with `<br>` so each
/// record stays on one table row. Pipe characters are escaped.
pub fn format_markdown_table(records: &[Record]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Catalog Results ({})\n\n", records.len()));

    if records.is_empty() {
        md.push_str("_No results._\n");
        return md;
    }

    md.push_str("| # | ID | Title | Author | Publisher | Year | Language | Pages | Size | Format | ISBN | Links |\n");
    md.push_str("|---|----|-------|--------|-----------|------|----------|-------|------|--------|------|-------|\n");

    for (index, record) in records.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            index + 1,
            cell(&record.id),
            cell(&record.title),
            cell(&record.author),
            cell(&record.publisher),
            cell(&record.year),
            cell(&record.language),
            cell(&record.pages),
            cell(&record.size),
            cell(&record.format),
            cell(&record.isbn.join("<br>")),
            cell(&record.content_url.join("<br>")),
        ));
    }

    md
}

/// Escapes a value for use inside a table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
