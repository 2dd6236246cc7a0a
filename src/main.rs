//! Ticker-Sweep main entry point
//!
//! This is the command-line interface for the Ticker-Sweep symbol crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use ticker_sweep::config::{load_config_with_hash, validate, Config, ExportFormat};
use ticker_sweep::crawler::{build_driver, Progress, ProgressSink, TracingSink};
use ticker_sweep::output::{exporter_for, print_summary, select_symbols, RunStatus, RunSummary};
use ticker_sweep::symbols::SymbolKind;
use tracing_subscriber::EnvFilter;

/// Ticker-Sweep: enumerate every ticker symbol behind a prefix-search API
///
/// The search endpoint answers at most ten results per query and has no
/// pagination. Ticker-Sweep deepens every truncated prefix by one character
/// until each prefix is answered in full, then exports the unique symbols.
#[derive(Parser, Debug)]
#[command(name = "ticker-sweep")]
#[command(version)]
#[command(about = "Enumerate ticker symbols through a prefix-search API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Kind of instrument to collect
    #[arg(short, long, value_enum)]
    kind: Option<SymbolKind>,

    /// Use http instead of https (for restrictive networks)
    #[arg(short, long)]
    insecure: bool,

    /// Output file (defaults to <kind>.<format extension>)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Export format
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Only export symbols listed on this exchange
    #[arg(short = 'E', long)]
    exchange: Option<String>,

    /// Pause between queries, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Comma-separated seed queries replacing a-z
    #[arg(long, value_delimiter = ',')]
    seeds: Option<Vec<String>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log progress instead of drawing a progress bar
    #[arg(long)]
    no_progress: bool,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(kind) = self.kind {
            config.crawl.kind = kind;
        }
        if self.insecure {
            config.client.insecure = true;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(exchange) = &self.exchange {
            config.output.exchange = Some(exchange.clone());
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawl.query_delay_ms = delay_ms;
        }
        if let Some(seeds) = &self.seeds {
            config.crawl.seeds = Some(seeds.clone());
        }
    }
}

/// Progress sink drawing an indicatif bar; notes are printed above it
struct BarSink {
    bar: ProgressBar,
}

/// Creates the query progress bar; its length follows the growing frontier
fn new_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

impl ProgressSink for BarSink {
    fn note(&self, message: &str) {
        self.bar.println(message);
    }

    fn update(&self, progress: &Progress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.processed as u64);
        self.bar.set_message(format!(
            "{} symbols, query '{}'",
            progress.symbols,
            progress.current.as_deref().unwrap_or("")
        ));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_sweep(&cli, config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ticker_sweep=info,warn"),
            1 => EnvFilter::new("ticker_sweep=debug,info"),
            2 => EnvFilter::new("ticker_sweep=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Ticker-Sweep Dry Run ===\n");

    println!("Client:");
    let scheme = if config.client.insecure { "http" } else { "https" };
    println!("  Endpoint: {}://{}", scheme, config.client.endpoint);
    println!("  User agent: {}", config.client.user_agent);
    println!(
        "  Timeouts: connect {}s, read {}s",
        config.client.connect_timeout_secs, config.client.read_timeout_secs
    );

    println!("\nRetry:");
    println!("  Max retries: {}", config.retry.max_retries);
    println!(
        "  Backoff: {}^k x {}ms",
        config.retry.base, config.retry.unit_ms
    );

    println!("\nCrawl:");
    println!("  Kind: {}", config.crawl.kind);
    match &config.crawl.seeds {
        Some(seeds) => println!("  Seeds ({}): {}", seeds.len(), seeds.join(", ")),
        None => println!("  Seeds: a-z"),
    }
    println!("  Query delay: {}ms", config.crawl.query_delay_ms);

    println!("\nOutput:");
    println!("  Path: {}", config.output_path());
    println!("  Format: {:?}", config.output.format);
    if let Some(exchange) = &config.output.exchange {
        println!("  Exchange filter: {}", exchange);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main sweep: crawl, export, summarize
async fn handle_sweep(
    cli: &Cli,
    config: Config,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    let bar = if cli.no_progress || cli.quiet {
        None
    } else {
        Some(new_progress_bar())
    };

    let driver = build_driver(&config)?;
    let mut driver = match &bar {
        Some(bar) => driver.with_sink(BarSink { bar: bar.clone() }),
        None => driver.with_sink(TracingSink),
    };

    tracing::info!(
        "Collecting {} symbols from {}",
        config.crawl.kind,
        config.client.endpoint
    );

    let started_at = Utc::now();
    let (status, outcome) = tokio::select! {
        result = driver.run() => (RunStatus::from_outcome(&result), result),
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted; exporting the symbols collected so far");
            (RunStatus::Interrupted, Ok(()))
        }
    };
    let finished_at = Utc::now();

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let symbols = select_symbols(driver.store(), config.output.exchange.as_deref());
    let mut summary = RunSummary {
        started_at,
        finished_at,
        status,
        config_hash,
        queries: driver.frontier().len(),
        steps: driver.steps(),
        symbols: driver.store().count(),
        exported: symbols.len(),
    };

    // Nothing is exported after a fatal error
    if let Err(e) = outcome {
        tracing::error!("Sweep failed: {}", e);
        summary.exported = 0;
        if !cli.quiet {
            print_summary(&summary);
        }
        return Err(e.into());
    }

    let output_path = config.output_path();
    exporter_for(config.output.format, Path::new(&output_path), Some(summary.clone()))
        .export(&symbols)
        .await
        .with_context(|| format!("Failed to export symbols to {}", output_path))?;

    if !cli.quiet {
        print_summary(&summary);
        println!("\n✓ Symbols exported to: {}", output_path);
    }

    Ok(())
}
