//! `slot` CLI - check class clashes and find free class slots for a roster.
//!
//! ## Usage
//!
//! ```sh
//! # Earliest free 2-hour slot between 10:00 and 15:00
//! slot avail 1000-1500 120 --roster roster.json
//!
//! # Pin the reference clock instead of using the local time
//! slot avail 1000-1500 60 --roster roster.json --today 2022-12-16 --now 1000
//!
//! # Does a proposed class clash with anything booked?
//! slot check "2022-12-16 1100-1200" --roster roster.json
//!
//! # Book (or move) a student's class and print the updated roster
//! slot book Alice "Mon 1000-1100" --roster roster.json -o roster.json
//! ```
//!
//! The roster file is a JSON array of `{"name": ..., "class": "YYYY-MM-DD HHMM-HHMM"}`
//! records; `class` may be omitted for students with nothing booked. When
//! `--roster` is omitted the roster is read from stdin.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use slot_engine::parse::{parse_date, parse_time};
use slot_engine::{parse_class, parse_window, Roster, Student};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slot",
    version,
    about = "Class clash checks and free-slot search for a student roster"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Args)]
struct ClockArgs {
    /// Reference date (YYYY-MM-DD); defaults to today's local date
    #[arg(long)]
    today: Option<String>,
    /// Reference time (HHMM); defaults to the current local time
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the earliest free slot inside a daily window
    Avail {
        /// Daily window as HHMM-HHMM
        range: String,
        /// Class length in minutes
        duration: String,
        /// Roster JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        roster: Option<String>,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Check whether a class clashes with the roster's bookings
    Check {
        /// Class as "YYYY-MM-DD HHMM-HHMM" or "DDD HHMM-HHMM"
        class: String,
        /// Roster JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        roster: Option<String>,
        /// Ignore this student's own class (when moving it)
        #[arg(long)]
        student: Option<String>,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Book a class for a student and print the updated roster
    Book {
        /// Student name
        name: String,
        /// Class as "YYYY-MM-DD HHMM-HHMM" or "DDD HHMM-HHMM"
        class: String,
        /// Roster JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        roster: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        clock: ClockArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Avail {
            range,
            duration,
            roster,
            clock,
        } => {
            let window = parse_window(&format!("{} {}", range, duration))
                .context("Invalid availability window")?;
            let roster = load_roster(roster.as_deref())?;
            let reference = reference_clock(&clock)?;
            let slot = roster.find_available_slot(&window, reference.date(), reference.time());
            println!("Available slot: {}", slot);
        }
        Commands::Check {
            class,
            roster,
            student,
            clock,
        } => {
            let roster = load_roster(roster.as_deref())?;
            let candidate = parse_class(&class, reference_clock(&clock)?)
                .with_context(|| format!("Invalid class: {}", class))?;

            if let Err(err) = roster.check_conflict(&candidate, student.as_deref()) {
                let clashes: Vec<String> = roster
                    .find_conflicts(&candidate, student.as_deref())
                    .into_iter()
                    .map(|(name, c)| {
                        format!("{} ({}, {} min overlap)", name, c.existing, c.overlap_minutes)
                    })
                    .collect();
                anyhow::bail!("{}: clashes with {}", err, clashes.join(", "));
            }
            println!("ok: {} is free", candidate);
        }
        Commands::Book {
            name,
            class,
            roster,
            output,
            clock,
        } => {
            let mut roster = load_roster(roster.as_deref())?;
            let class = parse_class(&class, reference_clock(&clock)?)
                .with_context(|| format!("Invalid class: {}", class))?;
            roster
                .set_class(&name, class)
                .with_context(|| format!("Failed to book {} for {}", class, name))?;
            let json = serde_json::to_string_pretty(roster.students())?;
            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolve `--today`/`--now`, falling back to the local clock truncated to
/// the minute.
fn reference_clock(clock: &ClockArgs) -> Result<NaiveDateTime> {
    let local = Local::now().naive_local();
    let today: NaiveDate = match clock.today.as_deref() {
        Some(text) => parse_date(text).context("Invalid --today")?,
        None => local.date(),
    };
    let now: NaiveTime = match clock.now.as_deref() {
        Some(text) => parse_time(text).context("Invalid --now")?,
        None => NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(local.time()),
    };
    debug!(%today, %now, "reference clock");
    Ok(today.and_time(now))
}

fn load_roster(path: Option<&str>) -> Result<Roster> {
    let json = read_input(path)?;
    let students: Vec<Student> =
        serde_json::from_str(&json).context("Failed to parse roster JSON")?;
    Roster::from_students(students).context("Roster contains invalid bookings")
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

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
