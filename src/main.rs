//! Address Scout main entry point
//!
//! Command-line interface: loads the configuration and the domain list, runs
//! the pipeline, stores the records, and prints the run summary.

use address_scout::config::{load_config_with_hash, Config};
use address_scout::input::{collect_user_agents, load_domains};
use address_scout::output::{persist_run, print_statistics, RunMetadata};
use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Address Scout: contact address discovery for company domains
///
/// Crawls each domain's home page and its about/contact pages, extracts
/// street and postal-code candidates, geocodes them, and stores one
/// reconciled address per domain.
#[derive(Parser, Debug)]
#[command(name = "address-scout")]
#[command(version)]
#[command(about = "Finds the postal address of company domains", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Domain list: one domain per line, or a CSV file with a `domain` column
    #[arg(value_name = "DOMAINS")]
    domains: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Additional newline-delimited user-agent file
    #[arg(long, value_name = "FILE")]
    user_agents: Option<PathBuf>,

    /// Validate config and inputs and show what would run, without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let domains = load_domains(&cli.domains).context("failed to load domain list")?;
    let user_agents = collect_user_agents(&config.user_agents, cli.user_agents.as_deref())
        .context("failed to load user agents")?;

    if cli.dry_run {
        handle_dry_run(&config, &domains, user_agents.len());
        return Ok(());
    }

    handle_run(&config, &config_hash, &domains, user_agents).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("address_scout=info,warn"),
            1 => EnvFilter::new("address_scout=debug,info"),
            2 => EnvFilter::new("address_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings and inputs
fn handle_dry_run(config: &Config, domains: &[String], user_agent_count: usize) {
    println!("=== Address Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Scheme: {}", config.crawler.scheme);
    println!("  Max concurrent crawls: {}", config.crawler.max_concurrent_crawls);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Skip error pages: {}", config.crawler.skip_error_pages);
    println!("  User agents: {}", user_agent_count);

    println!("\nExtractor:");
    println!("  Max text length: {}", config.extractor.max_text_length);
    println!("  Road types: {}", config.extractor.road_types.join(", "));

    println!("\nGeocoder:");
    println!("  Endpoint: {}", config.geocoder.endpoint);
    println!("  Max retries: {}", config.geocoder.max_retries);
    println!("  Min interval: {}ms", config.geocoder.min_interval_ms);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(csv_path) = &config.output.csv_path {
        println!("  CSV: {}", csv_path);
    }

    println!("\nDomains ({}):", domains.len());
    for domain in domains {
        println!("  - {}", domain);
    }

    println!("\n✓ Configuration is valid");
}

/// Runs the pipeline and writes its results
async fn handle_run(
    config: &Config,
    config_hash: &str,
    domains: &[String],
    user_agents: Vec<String>,
) -> anyhow::Result<()> {
    let started_at = Utc::now();

    let report = address_scout::run(config, domains, user_agents)
        .await
        .context("failed to start pipeline")?;

    let metadata = RunMetadata {
        started_at,
        finished_at: Utc::now(),
        config_hash: config_hash.to_string(),
        domains_in: report.stats.domains_in,
    };

    let persisted = persist_run(&config.output, &metadata, &report.records);

    print_statistics(&report.stats);

    let errors = persisted.errors();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("failed to write results: {}", messages.join("; "));
    }

    Ok(())
}
