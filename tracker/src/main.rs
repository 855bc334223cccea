//! Progress Tracker - feature list progress reporter.
//!
//! This binary prints coding-session progress and sends milestone and
//! webhook notifications when more features pass.
//!
//! # Commands
//!
//! - `progress-tracker summary`: Print progress and run the notification cycle
//! - `progress-tracker count`: Print passing and total counts only
//! - `progress-tracker header`: Print a session banner
//!
//! # Environment Variables
//!
//! See the [`config`] module for available configuration options.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use progress_tracker::config;
use progress_tracker::display::{session_header, SessionMode};
use progress_tracker::tracker::ProgressTracker;

/// Progress Tracker - feature list progress reporter.
///
/// Reads feature_list.json, prints progress, and notifies Telegram and a
/// generic webhook when more features pass.
#[derive(Parser, Debug)]
#[command(name = "progress-tracker")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TELEGRAM_BOT_TOKEN        Telegram bot token (milestone messages)
    TELEGRAM_CHAT_ID          Telegram chat id (milestone messages)
    TELEGRAM_API_URL          Telegram API base (default: https://api.telegram.org)
    PROGRESS_N8N_WEBHOOK_URL  Webhook receiving every progress increase
    PROGRESS_PROJECT_DIR      Project directory (default: current directory)
    RUST_LOG                  Log filter (default: info)

EXAMPLES:
    # Print a session banner
    progress-tracker header 2

    # Report progress for the current project
    export TELEGRAM_BOT_TOKEN=123:abc TELEGRAM_CHAT_ID=42
    progress-tracker summary

    # Counts for another project as JSON
    progress-tracker count --project-dir ../my-app --json
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print progress and notify sinks when it increased.
    ///
    /// Updates the .progress_cache file in the project directory.
    Summary {
        /// Directory containing feature_list.json.
        #[arg(short, long)]
        project_dir: Option<PathBuf>,
    },

    /// Print passing and total counts without notifying or caching.
    Count {
        /// Directory containing feature_list.json.
        #[arg(short, long)]
        project_dir: Option<PathBuf>,

        /// Print the full snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the banner for a coding session.
    Header {
        /// Session number.
        session: u32,

        /// Mark the session as the initializer.
        #[arg(short, long)]
        initializer: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Header {
            session,
            initializer,
        } => {
            println!(
                "{}",
                session_header(session, SessionMode::from_initializer(initializer))
            );
            Ok(())
        }
        Command::Count { project_dir, json } => run_count(project_dir, json),
        Command::Summary { project_dir } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;

            runtime.block_on(run_summary(project_dir))
        }
    }
}

/// Runs the count command.
fn run_count(project_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let project_dir = match project_dir {
        Some(dir) => dir,
        None => config::project_dir_from_env().context("Failed to resolve project directory")?,
    };

    let snapshot = ProgressTracker::new(project_dir).count();

    if json {
        let output =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{output}");
    } else {
        println!("{} {}", snapshot.passing, snapshot.total);
    }

    Ok(())
}

/// Runs the summary command: progress line plus notification cycle.
async fn run_summary(project_dir: Option<PathBuf>) -> Result<()> {
    let tracker =
        ProgressTracker::from_env(project_dir).context("Failed to initialize progress tracker")?;

    if let Some(outcome) = tracker.print_progress_summary().await {
        info!(
            passing = outcome.snapshot.passing,
            previous = outcome.previous,
            milestone = ?outcome.milestone,
            cache_written = outcome.cache_written,
            "Progress cycle complete"
        );
    }

    Ok(())
}

/// Initializes the logging subsystem for every command.
///
/// Logs go to stderr so stdout carries only progress output, including the
/// machine-readable `count` output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
