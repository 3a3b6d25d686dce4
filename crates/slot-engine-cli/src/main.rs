//! `slots` CLI: evaluate appointment availability from a day snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Classify hourly 60-minute slots (stdin → stdout, JSON)
//! cat day.json | slots evaluate
//!
//! # 45-minute sessions on a 30-minute grid, human-readable
//! slots evaluate -i day.json --duration 45 --granularity 30 --format table
//!
//! # Where could booking 42 be moved to?
//! slots evaluate -i day.json --exclude 42
//!
//! # Would a 10:30 appointment collide with anything? (exit code 2 if so)
//! slots check -i day.json --start 10:30
//!
//! # Booked / unavailable / free blocks of the workday
//! slots timeline -i day.json
//!
//! # First bookable slot
//! slots next -i day.json --config clinic.toml
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`; `--verbose` raises the default to debug.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slot_engine::parse::parse_time_of_day;
use slot_engine::{
    DaySnapshot, EngineConfig, OccupancyPolicy, ResolvedDay, SlotAvailability, SlotRequest,
};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment slot availability for a clinic day snapshot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every candidate slot as available, booked or unavailable
    Evaluate {
        #[command(flatten)]
        query: QueryArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Check a single proposed start time for conflicting bookings
    Check {
        #[command(flatten)]
        query: QueryArgs,
        /// Proposed start time (HH:MM)
        #[arg(long)]
        start: String,
    },
    /// Show merged booked, unavailable and free blocks of the workday
    Timeline {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Print the first bookable slot, or "none"
    Next {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Snapshot JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Engine configuration TOML file
    #[arg(short, long)]
    config: Option<String>,
    /// Appointment length in minutes
    #[arg(long)]
    duration: Option<i64>,
    /// Minutes between candidate start times
    #[arg(long)]
    granularity: Option<i64>,
    /// Workday start (HH:MM)
    #[arg(long)]
    workday_start: Option<String>,
    /// Workday end (HH:MM)
    #[arg(long)]
    workday_end: Option<String>,
    /// Booking id to ignore (the booking being rescheduled)
    #[arg(long)]
    exclude: Option<String>,
    /// Only scheduled and completed bookings block slots
    #[arg(long)]
    confirmed_only: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Evaluate { query, format } => {
            let (day, request) = load(&query)?;
            let slots = day
                .evaluate(&request, query.exclude.as_deref())
                .context("Failed to evaluate slots")?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&slots)?),
                Format::Table => print!("{}", render_table(&slots)),
            }
        }
        Commands::Check { query, start } => {
            let (day, request) = load(&query)?;
            let start = parse_time_of_day(&start).context("Invalid --start")?;
            let conflicts = day
                .conflicts_at(start, &request, query.exclude.as_deref())
                .context("Failed to check conflicts")?;
            println!("{}", serde_json::to_string_pretty(&conflicts)?);
            if !conflicts.is_empty() {
                process::exit(2);
            }
        }
        Commands::Timeline { query } => {
            let (day, request) = load(&query)?;
            let timeline = day
                .timeline(&request, query.exclude.as_deref())
                .context("Failed to build timeline")?;
            println!("{}", serde_json::to_string_pretty(&timeline)?);
        }
        Commands::Next { query } => {
            let (day, request) = load(&query)?;
            match day
                .first_available(&request, query.exclude.as_deref())
                .context("Failed to evaluate slots")?
            {
                Some(slot) => println!(
                    "{}-{}",
                    slot.start.format("%H:%M"),
                    slot.end.format("%H:%M")
                ),
                None => println!("none"),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // try_init: a subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Read the snapshot and merge config file values with command-line overrides.
fn load(query: &QueryArgs) -> Result<(ResolvedDay, SlotRequest)> {
    let config = match &query.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            EngineConfig::from_toml_str(&raw)
                .with_context(|| format!("Failed to parse config: {}", path))?
        }
        None => EngineConfig::default(),
    };
    let config = apply_overrides(config, query);
    debug!(?config, "effective configuration");

    let request = config.slot_request().context("Invalid slot request")?;
    let timezone = config.timezone().context("Invalid timezone in config")?;

    let json = read_input(query.input.as_deref())?;
    let snapshot = DaySnapshot::from_json(&json).context("Failed to parse snapshot JSON")?;
    let day = snapshot
        .resolve_in(timezone)
        .context("Failed to resolve snapshot")?;
    Ok((day, request))
}

fn apply_overrides(mut config: EngineConfig, query: &QueryArgs) -> EngineConfig {
    if let Some(duration) = query.duration {
        config.duration_minutes = duration;
    }
    if let Some(granularity) = query.granularity {
        config.granularity_minutes = granularity;
    }
    if let Some(start) = &query.workday_start {
        config.workday_start = start.clone();
    }
    if let Some(end) = &query.workday_end {
        config.workday_end = end.clone();
    }
    if query.confirmed_only {
        config.occupancy = OccupancyPolicy::Confirmed;
    }
    config
}

fn render_table(slots: &[SlotAvailability]) -> String {
    let mut out = String::new();
    for slot in slots {
        out.push_str(&format!(
            "{}-{}  {}\n",
            slot.start.format("%H:%M"),
            slot.end.format("%H:%M"),
            slot.status
        ));
    }
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
