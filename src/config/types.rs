use serde::Deserialize;

/// Browser-like User-Agent; the catalog rejects default client identifiers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default mirror base URL
pub const DEFAULT_BASE_URL: &str = "https://libgen.li";

/// Main configuration structure for Catalog-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub mirror: MirrorConfig,
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of attempts per fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff factor in seconds; the wait before attempt n+1 is `factor * 2^(n-1)`
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for any single backoff wait, in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Honor `Retry-After` on 429 and 503 responses
    #[serde(default = "default_true")]
    pub respect_retry_after: bool,

    /// HTTP status codes that trigger a retry
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            max_backoff_secs: default_max_backoff_secs(),
            respect_retry_after: default_true(),
            retry_statuses: default_retry_statuses(),
            user_agent: default_user_agent(),
        }
    }
}

/// Mirror layout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MirrorConfig {
    /// Root address used to make site-relative links absolute
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Alternate hosts whose download pages already carry absolute links
    #[serde(default = "default_secondary_hosts")]
    pub secondary_hosts: Vec<String>,

    /// Substrings that mark an off-site href as a download candidate
    #[serde(default = "default_link_markers")]
    pub link_markers: Vec<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            secondary_hosts: default_secondary_hosts(),
            link_markers: default_link_markers(),
        }
    }
}

impl MirrorConfig {
    /// Builds a mirror configuration for a different base URL, keeping default hosts and markers
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_max_backoff_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_secondary_hosts() -> Vec<String> {
    vec!["library.lol".to_string()]
}

fn default_link_markers() -> Vec<String> {
    vec!["library.lol".to_string(), "sci-hub.ru".to_string()]
}
