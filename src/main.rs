//! Catalog-Mirror main entry point
//!
//! This is the command-line interface for searching a catalog mirror and
//! resolving download links.

use anyhow::Context;
use catalog_mirror::config::{load_config_with_hash, Config};
use catalog_mirror::mirror::DEFAULT_MAX_ENTRIES;
use catalog_mirror::output::{write_records, OutputFormat};
use catalog_mirror::search::DEFAULT_MAX_RESULTS;
use catalog_mirror::{Mirror, RecordFilter, SearchField, SearchQuery, Topic};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Mirror: search a library catalog mirror
///
/// Fetches search result pages with retry and backoff, extracts the result
/// table into records, and resolves download-page links.
#[derive(Parser, Debug)]
#[command(name = "catalog-mirror")]
#[command(version)]
#[command(about = "Search a library catalog mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog and print the extracted records
    Search(SearchArgs),

    /// Resolve the direct link on a download page
    Resolve {
        /// Download page URL, e.g. a `content_url` entry from a search
        url: String,
    },

    /// Validate the configuration and print the effective settings and hash
    CheckConfig,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Search terms
    query: String,

    /// Restrict matching to a column (title, authors, series, year, publisher, isbn)
    #[arg(long = "field", value_name = "FIELD")]
    fields: Vec<SearchField>,

    /// Restrict to a catalog section (libgen, comics, fiction, scientific-articles,
    /// magazines, fiction-russian, standards)
    #[arg(long = "topic", value_name = "TOPIC")]
    topics: Vec<Topic>,

    /// Results requested from the catalog per page
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// Result page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Maximum number of records to print
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    limit: usize,

    /// Keep records whose title contains this text
    #[arg(long)]
    title: Option<String>,

    /// Keep records whose author contains this text
    #[arg(long)]
    author: Option<String>,

    /// Keep records whose language contains this text
    #[arg(long)]
    language: Option<String>,

    /// Keep records whose year contains this text
    #[arg(long)]
    year: Option<String>,

    /// Keep records whose publisher contains this text
    #[arg(long)]
    publisher: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also print the page's supplementary JSON link
    #[arg(long)]
    json_link: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, hash) = load_configuration(cli.config.as_ref())?;

    match cli.command {
        Command::Search(args) => handle_search(config, args)?,
        Command::Resolve { url } => handle_resolve(config, &url)?,
        Command::CheckConfig => handle_check_config(&config, hash.as_deref()),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_mirror=info,warn"),
            1 => EnvFilter::new("catalog_mirror=debug,info"),
            2 => EnvFilter::new("catalog_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if one was given, otherwise the defaults
///
/// The hash is `None` when no file was given.
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok((Config::default(), None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok((config, Some(hash)))
}

/// Handles the `search` command
fn handle_search(config: Config, args: SearchArgs) -> anyhow::Result<()> {
    let mirror = Mirror::new(config).context("failed to initialize mirror client")?;

    let query = SearchQuery::new(&args.query)
        .with_fields(args.fields)
        .with_topics(args.topics)
        .with_max_results(args.max_results)
        .with_page(args.page);

    let Some(page) = mirror.search(&query) else {
        eprintln!("No content available for '{}'", args.query);
        return Ok(());
    };

    if args.json_link {
        match mirror.get_json(Some(&page)) {
            Some(link) => eprintln!("JSON: {}", link),
            None => eprintln!("JSON: (not found)"),
        }
    }

    let records = mirror
        .get_metadata(Some(&page), args.limit)
        .unwrap_or_default();

    let filter = RecordFilter {
        title: args.title,
        author: args.author,
        language: args.language,
        year: args.year,
        publisher: args.publisher,
    };
    let records = if filter.is_empty() {
        records
    } else {
        Mirror::filtered(&records, &filter)
    };

    write_records(&records, args.format, args.output.as_deref())
        .context("failed to write results")?;

    if let Some(path) = &args.output {
        eprintln!("Wrote {} records to {}", records.len(), path.display());
    }

    Ok(())
}

/// Handles the `resolve` command
fn handle_resolve(config: Config, url: &str) -> anyhow::Result<()> {
    let mirror = Mirror::new(config).context("failed to initialize mirror client")?;

    match mirror.resolve_download(url) {
        Some(link) if !link.is_empty() => println!("{}", link),
        Some(_) => eprintln!("Download page has a link without a target"),
        None => eprintln!("Could not resolve a download link from {}", url),
    }

    Ok(())
}

/// Handles the `check-config` command
fn handle_check_config(config: &Config, hash: Option<&str>) {
    print!("{}", format_config_summary(config, hash));
}

/// Formats the effective configuration, with its file hash when one was loaded
fn format_config_summary(config: &Config, hash: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("=== Catalog-Mirror Configuration ===\n\n");
    out.push_str(&format!("Hash: {}\n\n", hash.unwrap_or("(defaults)")));

    out.push_str("Fetch:\n");
    out.push_str(&format!("  Timeout: {}s\n", config.fetch.timeout_secs));
    out.push_str(&format!("  Max attempts: {}\n", config.fetch.max_retries));
    out.push_str(&format!("  Backoff factor: {}\n", config.fetch.backoff_factor));
    out.push_str(&format!("  Max backoff: {}s\n", config.fetch.max_backoff_secs));
    out.push_str(&format!("  Respect Retry-After: {}\n", config.fetch.respect_retry_after));
    out.push_str(&format!("  Retry statuses: {:?}\n", config.fetch.retry_statuses));
    out.push_str(&format!("  User-Agent: {}\n", config.fetch.user_agent));

    out.push_str("\nMirror:\n");
    out.push_str(&format!("  Base URL: {}\n", config.mirror.base_url));
    out.push_str(&format!("  Secondary hosts: {}\n", config.mirror.secondary_hosts.join(", ")));
    out.push_str(&format!("  Link markers: {}\n", config.mirror.link_markers.join(", ")));

    out.push_str("\nConfiguration is valid.\n");
    out
}
