//! Lease Mileage Tracker CLI Application
//!
//! This is the command-line front end for the lease-ledger library.
//! It adds:
//! - Configuration loading (config.toml)
//! - Terminal confirmation prompts
//! - Text reports (summary, entry table, monthly and weekly views)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lease_ledger::{JsonFileStore, Outcome, Prompt, Tracker};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod config;
mod report;

/// Lease Mileage Tracker - Record odometer readings against a lease allowance
#[derive(Parser, Debug)]
#[command(name = "lease-cli")]
#[command(about = "Track odometer readings against a lease mileage allowance", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON entry store (overrides the config file)
    #[arg(short, long, value_name = "FILE", global = true)]
    store: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record (or replace) the odometer reading for a date
    Add {
        /// Reading date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Odometer value in miles
        #[arg(short, long)]
        odometer: String,
    },
    /// Delete the reading for a date
    Delete {
        /// Reading date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Remove every reading
    Reset,
    /// Show progress, penalty, entries and monthly summary
    Show,
    /// Show the weekly chart series
    Weeks {
        /// Include weeks without a recorded reading
        #[arg(long)]
        all: bool,
    },
    /// Show miles driven per month
    Months,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::debug!("Lease Mileage Tracker CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using ledger library v{}", lease_ledger::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    let store_path = args
        .store
        .clone()
        .unwrap_or_else(|| app_config.store.path.clone());
    let store = JsonFileStore::with_key(&store_path, app_config.store.key.clone());
    let lease = app_config.lease.clone();
    let mut tracker = Tracker::open(lease.clone(), store)
        .with_context(|| format!("Failed to open entry store: {:?}", store_path))?;

    let outcome = match args.command.unwrap_or(Command::Show) {
        Command::Add { date, odometer } => {
            Some(tracker.on_submit(&date, &odometer, confirmation(args.yes))?)
        }
        Command::Delete { date } => Some(tracker.on_delete(&date, confirmation(args.yes))?),
        Command::Reset => Some(tracker.on_reset(confirmation(args.yes))?),
        Command::Show => {
            let mut out = String::new();
            report::write_overview(&mut out, &tracker.dashboard(), &lease)?;
            print!("{}", out);
            None
        }
        Command::Weeks { all } => {
            let mut out = String::new();
            report::write_weeks(&mut out, &tracker.dashboard(), all)?;
            print!("{}", out);
            None
        }
        Command::Months => {
            let mut out = String::new();
            report::write_months(&mut out, &tracker.dashboard())?;
            print!("{}", out);
            None
        }
    };

    if let Some(outcome) = outcome {
        match outcome {
            Outcome::Applied => {
                if !args.quiet {
                    let mut out = String::new();
                    report::write_summary(&mut out, &tracker.dashboard(), &lease)?;
                    print!("{}", out);
                }
            }
            Outcome::Declined => println!("Cancelled, nothing changed."),
            Outcome::Unchanged => println!("Nothing to change."),
        }
    }

    Ok(())
}

/// Confirmation capability for mutating commands
///
/// With `--yes` every prompt is accepted; otherwise the question is asked on
/// the terminal.
fn confirmation(yes: bool) -> impl FnMut(&Prompt) -> bool {
    move |prompt: &Prompt| {
        yes || ask(prompt).unwrap_or_else(|e| {
            log::error!("Failed to read confirmation: {}", e);
            false
        })
    }
}

fn ask(prompt: &Prompt) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_add() {
        let args = Args::try_parse_from([
            "lease-cli", "--yes", "add", "--date", "2025-08-05", "--odometer", "200",
        ])
        .unwrap();
        assert!(args.yes);
        match args.command {
            Some(Command::Add { date, odometer }) => {
                assert_eq!(date, "2025-08-05");
                assert_eq!(odometer, "200");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["lease-cli", "reset", "-y", "-s", "m.json"]).unwrap();
        assert!(args.yes);
        assert_eq!(args.store, Some(PathBuf::from("m.json")));
        assert!(matches!(args.command, Some(Command::Reset)));
    }

    #[test]
    fn test_preset_confirmation() {
        let mut confirm = confirmation(true);
        assert!(confirm(&Prompt::Reset { entries: 2 }));
    }
}
