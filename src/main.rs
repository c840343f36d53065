//! scholarstats - Google Scholar profile report
//!
//! Fetches a researcher's citation metrics and full publication list, then
//! prints publications ranked by citations, publications cited fewer times
//! than their age, and summary statistics.
//!
//! ## Usage
//!
//! ```bash
//! scholarstats report "https://scholar.google.com/citations?user=6ImtercAAAAJ&hl=en"
//! scholarstats publications --user 6ImtercAAAAJ --view undercited --format csv
//! ```

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scholarstats::fetch::{FetchOptions, HttpFetcher, DEFAULT_TIMEOUT};
use scholarstats::profile::fetch_metrics;
use scholarstats::publications::{
    fetch_all_publications, PaginationOptions, ProfileQuery, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
};
use scholarstats::report::{write_report, OutputFormat, Report, Section};
use std::io::Write;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Google Scholar profile metrics, citation ranking and undercitation report
#[derive(Parser)]
#[command(name = "scholarstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Citation metrics, ranked and undercited publications, and summary
    Report(ProfileArgs),

    /// Citation metrics only
    Metrics(ProfileArgs),

    /// A single publication view
    Publications {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Which view to print
        #[arg(long, value_enum, default_value = "ranked")]
        view: View,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    /// All publications by citation count
    Ranked,
    /// Publications with fewer citations than years since publication
    Undercited,
    /// Summary statistics
    Summary,
}

#[derive(Args)]
struct ProfileArgs {
    /// Profile URL (e.g., https://scholar.google.com/citations?user=XXXX&hl=en)
    #[arg(required_unless_present = "user")]
    url: Option<String>,

    /// Scholar user identifier (overrides the URL's `user` parameter)
    #[arg(long)]
    user: Option<String>,

    /// Interface locale (overrides the URL's `hl` parameter)
    #[arg(long)]
    hl: Option<String>,

    /// Host serving the profile pages (default: the profile URL's host)
    #[arg(long)]
    base_url: Option<String>,

    /// Publications per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Stop after this many listing pages (0 = no limit)
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Reference year for publication age (default: this year)
    #[arg(long)]
    current_year: Option<i32>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Proxy URL (e.g., http://127.0.0.1:7890)
    #[arg(long)]
    proxy: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Report(args) => run(
            args,
            vec![Section::Metrics, Section::Ranked, Section::Undercited, Section::Summary],
        )
        .await,
        Commands::Metrics(args) => run(args, vec![Section::Metrics]).await,
        Commands::Publications { profile, view } => {
            let section = match view {
                View::Ranked => Section::Ranked,
                View::Undercited => Section::Undercited,
                View::Summary => Section::Summary,
            };
            run(profile, vec![section]).await
        }
    }
}

// ============================================================================
// Report
// ============================================================================

async fn run(args: ProfileArgs, sections: Vec<Section>) -> Result<()> {
    let fetch_options = FetchOptions {
        timeout: Duration::from_secs(args.timeout),
        proxy: args.proxy.clone(),
        ..Default::default()
    };
    let fetcher = HttpFetcher::new(&fetch_options).context("Failed to build HTTP client")?;

    let pagination = PaginationOptions {
        page_size: args.page_size,
        max_pages: (args.max_pages > 0).then_some(args.max_pages),
    };
    let current_year = args.current_year.unwrap_or_else(|| Local::now().year());

    let query = ProfileQuery {
        url: args.url.clone(),
        user: args.user.clone(),
        locale: args.hl.clone(),
        base_url: args.base_url.clone(),
    };
    let profile = query.resolve();

    let metrics = if sections.contains(&Section::Metrics) {
        let result = match query.metrics_url() {
            Ok(url) => fetch_metrics(&fetcher, &url).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(error = %e, "Failed to fetch metrics");
        }
        Some(result)
    } else {
        None
    };

    let publications = if sections.iter().any(|s| *s != Section::Metrics) {
        let result = match profile {
            Ok(profile) => fetch_all_publications(&fetcher, &profile, &pagination).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(error = %e, "Failed to fetch publications");
        }
        Some(result)
    } else {
        None
    };

    let report = Report {
        metrics,
        publications,
        current_year,
        sections,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &report, args.format).context("Failed to write report")?;
    out.flush()?;

    info!("Done");
    Ok(())
}
