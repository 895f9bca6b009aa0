use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use catalog_mirror::url::extract_domain;
///
/// let url = Url::parse("https://LIBGEN.li/index.php").unwrap();
/// assert_eq!(extract_domain(&url), Some("libgen.li".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a mirror base URL and returns its lowercase host
///
/// Only `http` and `https` bases are accepted.
pub fn mirror_host(base_url: &str) -> UrlResult<String> {
    let url = Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    extract_domain(&url).ok_or(UrlError::MissingHost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://libgen.li/").unwrap();
        assert_eq!(extract_domain(&url), Some("libgen.li".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/ads.php").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_mirror_host() {
        assert_eq!(mirror_host("https://libgen.li").unwrap(), "libgen.li");
        assert_eq!(mirror_host("https://Mirror.Example.org/base/").unwrap(), "mirror.example.org");
    }

    #[test]
    fn test_mirror_host_rejects_bad_input() {
        assert!(matches!(mirror_host("nonsense"), Err(UrlError::Parse(_))));
        assert!(matches!(
            mirror_host("ftp://files.example.org"),
            Err(UrlError::InvalidScheme(_))
        ));
    }
}
