//! Command-line entry point for the event merge engine.
//!
//! # Responsibility
//! - Parse global storage/logging flags and dispatch subcommands.
//! - Print results as JSON on stdout; report failures as one `error:` line
//!   on stderr with exit code 1.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "eventmerge", version, about = "Merge overlapping calendar events")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "EVENTMERGE_DB", default_value = "eventmerge.db")]
    db: PathBuf,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "EVENTMERGE_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rotated log files; logging is off when unset
    #[arg(long, global = true, env = "EVENTMERGE_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Merge every cluster of overlapping events for one user
    Merge {
        /// User id
        user_id: Uuid,
    },
    /// Report users whose events overlap, without changing anything
    Overlaps,
    /// Check core library linkage
    Ping,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(eventmerge_core::default_log_level());
        eventmerge_core::init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    match cli.command {
        Commands::User { action } => commands::user::run(&cli.db, action),
        Commands::Event { action } => commands::event::run(&cli.db, action),
        Commands::Merge { user_id } => commands::merge::run_merge(&cli.db, user_id),
        Commands::Overlaps => commands::merge::run_overlaps(&cli.db),
        Commands::Ping => {
            println!("eventmerge_core ping={}", eventmerge_core::ping());
            println!("eventmerge_core version={}", eventmerge_core::core_version());
            Ok(())
        }
    }
}
