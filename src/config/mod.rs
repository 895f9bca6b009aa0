//! Configuration module for Catalog-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; an empty file yields [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use catalog_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Fetches will time out after {}s", config.fetch.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, MirrorConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
