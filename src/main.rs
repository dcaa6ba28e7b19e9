//! Exam-Harvest main entry point
//!
//! This is the command-line interface for the Exam-Harvest crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use exam_harvest::config::{load_config_with_hash, Config};
use exam_harvest::crawler::{build_targets, crawl};
use exam_harvest::output::{
    compute_statistics, export_all, generate_markdown_summary, print_statistics, SummaryContext,
};
use exam_harvest::storage::load_dataset;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exam-Harvest: an incremental exam-archive crawler
///
/// Exam-Harvest walks the role listing pages of an exam archive, visits each
/// exam's detail page once, and records the document links it finds in a
/// JSON dataset. Interrupted crawls resume where they stopped.
#[derive(Parser, Debug)]
#[command(name = "exam-harvest")]
#[command(version)]
#[command(about = "An incremental exam-archive crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start from an empty dataset, ignoring previous state
    #[arg(long)]
    fresh: bool,

    /// Crawl only the target with this slug (repeatable)
    #[arg(long, value_name = "SLUG")]
    only: Vec<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export", "export_summary"])]
    stats: bool,

    /// Write per-category files and the document URL index, then exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    export: bool,

    /// Generate markdown summary from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &cli.only)?;
    } else if cli.stats {
        handle_stats(&config);
    } else if cli.export {
        handle_export(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config, config_hash)?;
    } else {
        handle_crawl(&config, cli.fresh, &cli.only).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("exam_harvest=info,warn"),
            1 => EnvFilter::new("exam_harvest=debug,info"),
            2 => EnvFilter::new("exam_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, only: &[String]) -> anyhow::Result<()> {
    let targets = build_targets(config, only)?;

    println!("=== Exam-Harvest Dry Run ===\n");

    println!("Pacing:");
    println!("  Inter-exam delay: {}ms", config.crawler.inter_exam_delay_ms);
    println!(
        "  Inter-target delay: {}ms",
        config.crawler.inter_target_delay_ms
    );
    println!(
        "  Revisit unreachable pages: {}",
        config.crawler.revisit_unreachable
    );

    println!("\nRetry:");
    println!("  Initial timeout: {}ms", config.retry.initial_timeout_ms);
    println!("  Retries: {}", config.retry.retries);
    println!(
        "  Timeout increment: {}ms",
        config.retry.timeout_increment_ms
    );
    println!(
        "  Backoff: {}ms + {}ms per attempt",
        config.retry.backoff_base_ms, config.retry.backoff_step_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Export directory: {}", config.output.export_dir);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nTargets ({}):", targets.len());
    for target in &targets {
        println!("  - {} -> {}", target.name, target.listing_url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} role targets", targets.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the dataset
fn handle_stats(config: &Config) {
    println!("Dataset: {}\n", config.output.dataset_path);

    let dataset = load_dataset(Path::new(&config.output.dataset_path));
    print_statistics(&compute_statistics(&dataset));
}

/// Handles the --export mode: writes per-category files and the URL index
fn handle_export(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Dataset ===\n");
    println!("Dataset: {}", config.output.dataset_path);
    println!("Output: {}", config.output.export_dir);
    println!();

    let dataset = load_dataset(Path::new(&config.output.dataset_path));
    let written = export_all(&dataset, Path::new(&config.output.export_dir))
        .context("Failed to export dataset")?;

    for path in &written {
        println!("  {}", path.display());
    }
    println!("\n✓ Exported {} files", written.len());

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config, config_hash: String) -> anyhow::Result<()> {
    println!("=== Exporting Dataset Summary ===\n");
    println!("Dataset: {}", config.output.dataset_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    tracing::info!("Loading dataset...");
    let dataset = load_dataset(Path::new(&config.output.dataset_path));

    tracing::info!("Generating markdown summary...");
    let context = SummaryContext {
        generated_at: Utc::now(),
        dataset_path: config.output.dataset_path.clone(),
        config_hash: Some(config_hash),
    };
    generate_markdown_summary(
        &compute_statistics(&dataset),
        &context,
        Path::new(&config.output.summary_path),
    )
    .context("Failed to write summary")?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool, only: &[String]) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (already resolved exams are skipped)");
    }

    let report = crawl(config, fresh, only).await.context("Crawl failed")?;

    if report.targets_failed > 0 {
        tracing::warn!(
            "{} role targets produced no exams; rerun to retry them",
            report.targets_failed
        );
    }

    Ok(())
}
