//! SEO Sweep main entry point
//!
//! This is the command-line interface for the SEO Sweep site auditor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use seo_sweep::analysis::{analyze_issues, seo_score, PageAnalyzer, MAX_SEO_SCORE};
use seo_sweep::config::{default_config_with_hash, load_config_with_hash, Config};
use seo_sweep::crawler::{Coordinator, CrawlRequest};
use seo_sweep::output::{
    default_export_path, generate_markdown_report, load_session, write_export, ExportFormat,
};
use seo_sweep::storage::{SqliteStorage, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// SEO Sweep: a polite site auditor
///
/// SEO Sweep crawls one website breadth-first while respecting robots.txt,
/// analyzes the on-page SEO signals of every page it finds, and stores the
/// results per session for later export and reporting.
#[derive(Parser, Debug)]
#[command(name = "seo-sweep")]
#[command(version)]
#[command(about = "A polite site auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl and analyze a site as a new session
    Crawl {
        /// Site to audit
        url: String,

        /// Maximum number of URLs to return and analyze
        #[arg(long)]
        max_urls: Option<u32>,

        /// Maximum link depth to follow
        #[arg(long)]
        max_depth: Option<u32>,

        /// Ignore robots.txt
        #[arg(long)]
        no_robots: bool,
    },

    /// Analyze a single page without crawling or storing anything
    Analyze {
        /// Page to analyze
        url: String,

        /// Ignore robots.txt
        #[arg(long)]
        no_robots: bool,
    },

    /// List stored sessions, newest first
    Sessions,

    /// Show the results of a session
    Results {
        session_id: i64,
    },

    /// Export the results of a session
    Export {
        session_id: i64,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (defaults to crawl_results_<ID>.<EXT> in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a markdown report of a session
    Report {
        session_id: i64,

        /// Output file (defaults to report_<ID>.md in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            default_config_with_hash()
        }
    };
    tracing::debug!("Configuration hash: {}", config_hash);

    match cli.command {
        Command::Crawl {
            url,
            max_urls,
            max_depth,
            no_robots,
        } => {
            let respect_robots = if no_robots { Some(false) } else { None };
            handle_crawl(config, config_hash, &url, max_urls, max_depth, respect_robots).await
        }
        Command::Analyze { url, no_robots } => handle_analyze(&config, &url, no_robots).await,
        Command::Sessions => handle_sessions(&config),
        Command::Results { session_id } => handle_results(&config, session_id),
        Command::Export {
            session_id,
            format,
            output,
        } => handle_export(&config, session_id, format, output),
        Command::Report { session_id, output } => handle_report(&config, session_id, output),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_sweep=info,warn"),
            1 => EnvFilter::new("seo_sweep=debug,info"),
            2 => EnvFilter::new("seo_sweep=trace,debug"),
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

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    SqliteStorage::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles `crawl`: runs one full session
async fn handle_crawl(
    config: Config,
    config_hash: String,
    url: &str,
    max_urls: Option<u32>,
    max_depth: Option<u32>,
    respect_robots: Option<bool>,
) -> anyhow::Result<()> {
    let request = CrawlRequest::with_defaults(url, max_urls, max_depth, respect_robots, &config.crawler)
        .with_context(|| format!("Cannot crawl {}", url))?;

    let storage = open_storage(&config)?;
    let mut coordinator =
        Coordinator::new(config, config_hash, storage).context("Failed to set up crawler")?;

    let outcome = coordinator
        .run(&request)
        .await
        .with_context(|| format!("Crawl of {} failed", request.base_url()))?;

    println!("Session {} completed", outcome.session_id);
    println!("  URLs found:    {}", outcome.urls_found);
    println!("  URLs analyzed: {}", outcome.urls_analyzed);
    println!("  Issues found:  {}", outcome.issues_found);

    Ok(())
}

/// Handles `analyze`: prints the signals, issues and score of one page
async fn handle_analyze(config: &Config, url: &str, no_robots: bool) -> anyhow::Result<()> {
    let respect_robots = if no_robots { Some(false) } else { None };
    let request = CrawlRequest::with_defaults(url, None, None, respect_robots, &config.crawler)
        .with_context(|| format!("Cannot analyze {}", url))?;

    let mut analyzer = PageAnalyzer::from_config(config, request.respect_robots())
        .context("Failed to set up analyzer")?;
    let signals = analyzer
        .analyze(request.base_url())
        .await
        .with_context(|| format!("Analysis of {} failed", request.base_url()))?;

    println!("{}", signals.url);
    println!("  SEO score:        {}/{}", seo_score(&signals), MAX_SEO_SCORE);
    println!("  Title:            {}", signals.title.as_deref().unwrap_or("-"));
    println!("  Meta description: {}", signals.meta_description.as_deref().unwrap_or("-"));
    println!("  H1 / H2:          {} / {}", signals.h1_tags.len(), signals.h2_tags.len());
    println!("  Words:            {}", signals.word_count);
    println!("  Load time:        {:.2}s", signals.load_time);
    println!("  Mobile friendly:  {}", signals.mobile_friendly);
    println!("  Links:            {} internal, {} external", signals.internal_links, signals.external_links);
    let keywords: Vec<String> = signals
        .keywords
        .iter()
        .map(|(word, count)| format!("{} ({})", word, count))
        .collect();
    println!("  Keywords:         {}", keywords.join(", "));
    println!("  robots.txt:       {}", signals.robots_txt_status);

    let issues = analyze_issues(&signals);
    println!();
    if issues.is_empty() {
        println!("No issues found.");
    } else {
        println!("{} issue(s):", issues.len());
        for issue in &issues {
            println!("    - {}", issue);
        }
    }

    Ok(())
}

/// Handles `sessions`: lists every stored session
fn handle_sessions(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let sessions = storage.list_sessions().context("Failed to list sessions")?;

    if sessions.is_empty() {
        println!("No sessions found in {}", config.output.database_path);
        return Ok(());
    }

    println!(
        "{:>5}  {:<10}  {:>6}  {:>8}  {:>6}  {:<25}  URL",
        "ID", "STATUS", "FOUND", "ANALYZED", "ISSUES", "STARTED"
    );
    for session in sessions {
        println!(
            "{:>5}  {:<10}  {:>6}  {:>8}  {:>6}  {:<25}  {}",
            session.id,
            session.status,
            session.total_urls_found,
            session.total_urls_analyzed,
            session.issues_found,
            session.started_at,
            session.base_url
        );
    }

    Ok(())
}

/// Handles `results`: prints every result of a session
fn handle_results(config: &Config, session_id: i64) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let (session, results) = load_session(&storage, session_id)
        .with_context(|| format!("Failed to load session {}", session_id))?;

    println!("Session {} ({}): {}", session.id, session.status, session.base_url);
    if let Some(error) = &session.error_message {
        println!("Error: {}", error);
    }
    println!();

    for result in &results {
        match &result.signals {
            Some(signals) => println!(
                "{}  [score {}/{}, {} issue(s), {} words, {:.2}s]",
                result.url,
                seo_score(signals),
                MAX_SEO_SCORE,
                result.issue_count(),
                signals.word_count,
                signals.load_time
            ),
            None => println!("{}  [failed]", result.url),
        }
        for issue in &result.issues {
            println!("    - {}", issue);
        }
    }

    Ok(())
}

/// Handles `export`: writes session results as CSV or JSON
fn handle_export(
    config: &Config,
    session_id: i64,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let (_, results) = load_session(&storage, session_id)
        .with_context(|| format!("Failed to load session {}", session_id))?;

    let path = output.unwrap_or_else(|| {
        default_export_path(Path::new(&config.output.export_dir), session_id, format)
    });
    write_export(&results, format, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Exported {} result(s) to: {}", results.len(), path.display());
    Ok(())
}

/// Handles `report`: writes a markdown report of a session
fn handle_report(config: &Config, session_id: i64, output: Option<PathBuf>) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let (session, results) = load_session(&storage, session_id)
        .with_context(|| format!("Failed to load session {}", session_id))?;

    let path = output.unwrap_or_else(|| {
        Path::new(&config.output.export_dir).join(format!("report_{}.md", session_id))
    });
    generate_markdown_report(&session, &results, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Report written to: {}", path.display());
    Ok(())
}
