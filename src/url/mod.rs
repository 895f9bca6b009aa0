//! URL helpers for Catalog-Mirror
//!
//! The catalog emits site-relative paths for thumbnails, download pages and
//! secondary links. These helpers turn them into absolute URLs against the
//! mirror base and decide which mirror a link belongs to.

mod domain;

pub use domain::{extract_domain, mirror_host};

/// Prefixes a path with the mirror base URL
///
/// Exactly one `/` separates the two parts, regardless of whether the base
/// ends with a slash or the path starts with one. No other resolution is done;
/// `..` segments and query strings pass through untouched.
///
/// # Examples
///
/// ```
/// use catalog_mirror::url::prefix_base;
///
/// assert_eq!(prefix_base("https://libgen.li", "/get/123"), "https://libgen.li/get/123");
/// assert_eq!(prefix_base("https://libgen.li/", "get.php?md5=ab"), "https://libgen.li/get.php?md5=ab");
/// ```
pub fn prefix_base(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns true if `candidate` mentions `host` (case-insensitive substring)
///
/// Used for source hints and hrefs, which may be full URLs or bare host names.
pub fn mentions_host(candidate: &str, host: &str) -> bool {
    !host.is_empty() && candidate.to_lowercase().contains(&host.to_lowercase())
}
