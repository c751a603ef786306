//! Command-line driver for the capture scheduler.
//!
//! Parses a schedule file, reports validity and conflict findings, and
//! (unless `--check` is given) submits the accepted recordings, writing a
//! full log and a success CSV into the configured logs directory.
//!
//! ```bash
//! capture-scheduler schedule.csv --term-start 2031-08-25 \
//!     --term-end 2031-12-12 --term F2031 --check
//! ```

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use capture_scheduler::config::SchedulerConfig;
use capture_scheduler::directory::{local::SiteFixture, LocalSite, RecorderCache};
use capture_scheduler::parser::{parse_file, ParseOptions};
use capture_scheduler::report;
use capture_scheduler::scheduler::{schedule_recordings, split_results};

/// Attempt to schedule the recordings provided in a tabular schedule file.
#[derive(Debug, Parser)]
#[command(name = "capture-scheduler", version)]
struct Cli {
    /// Schedule file to ingest.
    file: PathBuf,

    /// First day of the term (YYYY-MM-DD); carries Banner begin times.
    #[arg(long)]
    term_start: Option<NaiveDate>,

    /// Last day of the term (YYYY-MM-DD); carries Banner end times.
    #[arg(long)]
    term_end: Option<NaiveDate>,

    /// Term label appended to derived folder names.
    #[arg(long)]
    term: Option<String>,

    /// Validate the schedule and report findings without scheduling.
    #[arg(long)]
    check: bool,

    /// Configuration file (defaults to scheduler.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON fixture describing the site's recorders and folders, for runs
    /// against the in-memory site.
    #[arg(long)]
    site_fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SchedulerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SchedulerConfig::load_default().context("failed to load default config")?,
    };
    if !config.site.is_empty() {
        info!(site = %config.site, "targeting site");
    }

    let site = match &cli.site_fixture {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read site fixture {}", path.display()))?;
            let fixture: SiteFixture =
                serde_json::from_str(&content).context("failed to parse site fixture")?;
            LocalSite::from_fixture(&fixture)
        }
        None => LocalSite::new(),
    };

    let options = ParseOptions {
        term_start: cli.term_start,
        term_end: cli.term_end,
        term: cli.term.clone(),
        mediasite_folder_id: config.mediasite_folder_id(),
    };

    println!("Trying to parse the file...");
    let mut cache = RecorderCache::new();
    let output = parse_file(&cli.file, &site, &site, &mut cache, &options).await?;

    let stdout = io::stdout();
    let mut console = stdout.lock();
    report::write_schedule(&mut console, &output.accepted)?;
    report::write_parse_report(&mut console, &output.errors)?;
    println!("{} recordings ready to schedule.", output.accepted.len());
    if config.schedule_broadcasts {
        println!("schedule_broadcasts is set, all sessions will be scheduled as broadcasts.");
    }

    if cli.check {
        println!("Check complete, exiting.");
        return Ok(());
    }

    print!("Proceed? Press Enter to schedule, Ctrl-C to exit. ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let results = schedule_recordings(
        &site,
        output.accepted,
        config.schedule_broadcasts,
        None,
    )
    .await;
    let results = split_results(results);
    report::write_schedule_results(&mut console, &results)?;

    fs::create_dir_all(&config.logs_dir).with_context(|| {
        format!("failed to create logs directory {}", config.logs_dir.display())
    })?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let log_path = config.logs_dir.join(format!("{stamp}_full_log.txt"));
    let mut log_file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;
    report::write_schedule_results(&mut log_file, &results)?;

    println!("Writing output file...");
    let success_path =
        report::write_success_file(&site, &results.successes, &config.logs_dir, &stamp).await?;
    info!(path = %success_path.display(), "success file written");

    Ok(())
}
