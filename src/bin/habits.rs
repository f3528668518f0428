//! Habits CLI - Command-line interface for Habitflux
//!
//! Commands:
//! - stats: Compute a habit's derived statistics from a store file
//! - toggle: Flip the done-state of one day and write the store back
//! - import: Load a CSV/JSON completion record into a store
//! - export: Render a habit's completion record as CSV/JSON

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use habitflux::adapters::{csv, json, CompletionImportAdapter, CsvAdapter, JsonAdapter};
use habitflux::dates::{local_today, parse_day_key};
use habitflux::pipeline::completion_stats;
use habitflux::score::bucketed_scores;
use habitflux::types::Granularity;
use habitflux::{EngineError, Habit, HabitStore, ENGINE_VERSION};

/// Habits - On-device analytics engine for recurring-habit completion records
#[derive(Parser)]
#[command(name = "habits")]
#[command(author = "Synheart AI Inc")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Track habits and derive scores, streaks and history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a habit's derived statistics
    Stats {
        /// Store file path
        #[arg(short, long)]
        store: PathBuf,

        /// Habit name
        #[arg(long)]
        habit: String,

        /// Bucketing granularity for the score view
        #[arg(long, default_value = "week")]
        granularity: GranularityArg,

        /// Query day (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON (default when stdout is not a TTY)
        #[arg(long)]
        json: bool,
    },

    /// Flip the done-state of one day and write the store back
    Toggle {
        /// Store file path
        #[arg(short, long)]
        store: PathBuf,

        /// Habit name
        #[arg(long)]
        habit: String,

        /// Day to toggle (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Load a completion record into a store, creating the habit if needed
    Import {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Store file path (created if missing)
        #[arg(short, long)]
        store: PathBuf,

        /// Habit name
        #[arg(long)]
        habit: String,

        /// Input format
        #[arg(long, default_value = "json")]
        format: Format,
    },

    /// Render a habit's completion record
    Export {
        /// Store file path
        #[arg(short, long)]
        store: PathBuf,

        /// Habit name
        #[arg(long)]
        habit: String,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// `{"YYYY-MM-DD": marker}` object
    Json,
    /// `date,value` lines
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum GranularityArg {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Day => Granularity::Day,
            GranularityArg::Week => Granularity::Week,
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Quarter => Granularity::Quarter,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HabitsCliError> {
    match cli.command {
        Commands::Stats {
            store,
            habit,
            granularity,
            date,
            json,
        } => cmd_stats(&store, &habit, granularity.into(), date.as_deref(), json),

        Commands::Toggle { store, habit, date } => cmd_toggle(&store, &habit, date.as_deref()),

        Commands::Import {
            input,
            store,
            habit,
            format,
        } => cmd_import(&input, &store, &habit, format),

        Commands::Export {
            store,
            habit,
            output,
            format,
        } => cmd_export(&store, &habit, &output, format),
    }
}

fn cmd_stats(
    store_path: &Path,
    habit_name: &str,
    granularity: Granularity,
    date: Option<&str>,
    json: bool,
) -> Result<(), HabitsCliError> {
    let store = load_store(store_path)?;
    let habit = find_habit(&store, habit_name)?;
    let map = store.completions(habit.id)?;
    let today = resolve_date(date)?;

    let stats = completion_stats(map, today, habit.frequency);
    let buckets = bucketed_scores(map, today, habit.frequency, granularity);

    if json || !atty::is(atty::Stream::Stdout) {
        let report = serde_json::json!({
            "habit": habit.name,
            "date": today.to_string(),
            "granularity": granularity.as_str(),
            "stats": stats,
            "score_buckets": buckets,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} — {}", habit.name, today);
    println!("=================");
    println!("Score:       {}%", stats.score_percent);
    println!("Done days:   {}", map.done_count());

    if stats.streaks.is_empty() {
        println!("Streaks:     none yet");
    } else {
        println!("Streaks:");
        for streak in &stats.streaks {
            println!(
                "  {} .. {}  ({} days)",
                streak.start, streak.end, streak.length
            );
        }
    }

    println!("\nScore by {}:", granularity);
    for bucket in &buckets {
        println!("  {:<10} {:>5.1}%", bucket.label, bucket.value * 100.0);
    }

    Ok(())
}

fn cmd_toggle(
    store_path: &Path,
    habit_name: &str,
    date: Option<&str>,
) -> Result<(), HabitsCliError> {
    let mut store = load_store(store_path)?;
    let habit_id = find_habit(&store, habit_name)?.id;
    let day = resolve_date(date)?;

    let done = store.toggle_completion(habit_id, day)?;
    fs::write(store_path, store.to_json()?)?;

    println!(
        "{} on {}: {}",
        habit_name,
        day,
        if done { "done" } else { "not done" }
    );
    Ok(())
}

fn cmd_import(
    input: &Path,
    store_path: &Path,
    habit_name: &str,
    format: Format,
) -> Result<(), HabitsCliError> {
    let raw = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let map = match format {
        Format::Json => JsonAdapter.parse(&raw)?,
        Format::Csv => CsvAdapter.parse(&raw)?,
    };

    let mut store = if store_path.exists() {
        load_store(store_path)?
    } else {
        HabitStore::new()
    };

    let habit_id = match store.habit_by_name(habit_name) {
        Some(habit) => habit.id,
        None => store.add_habit(Habit::new(habit_name)),
    };

    let imported = map.done_count();
    store.replace_completions(habit_id, map)?;
    fs::write(store_path, store.to_json()?)?;

    println!("Imported {} done days into '{}'", imported, habit_name);
    Ok(())
}

fn cmd_export(
    store_path: &Path,
    habit_name: &str,
    output: &Path,
    format: Format,
) -> Result<(), HabitsCliError> {
    let store = load_store(store_path)?;
    let habit = find_habit(&store, habit_name)?;
    let map = store.completions(habit.id)?;

    let rendered = match format {
        Format::Json => json::to_json(map)?,
        Format::Csv => csv::to_csv(map),
    };

    if output.to_string_lossy() == "-" {
        print!("{}", rendered);
    } else {
        fs::write(output, rendered)?;
    }

    Ok(())
}

// Helper functions

fn load_store(path: &Path) -> Result<HabitStore, HabitsCliError> {
    let raw = fs::read_to_string(path)?;
    Ok(HabitStore::from_json(&raw)?)
}

fn find_habit<'a>(store: &'a HabitStore, name: &str) -> Result<&'a Habit, HabitsCliError> {
    store
        .habit_by_name(name)
        .ok_or_else(|| HabitsCliError::HabitNotFound(name.to_string()))
}

fn resolve_date(date: Option<&str>) -> Result<chrono::NaiveDate, HabitsCliError> {
    match date {
        Some(raw) => Ok(parse_day_key(raw)?),
        None => Ok(local_today()),
    }
}

// Error types

#[derive(Debug)]
enum HabitsCliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    HabitNotFound(String),
}

impl From<io::Error> for HabitsCliError {
    fn from(e: io::Error) -> Self {
        HabitsCliError::Io(e)
    }
}

impl From<EngineError> for HabitsCliError {
    fn from(e: EngineError) -> Self {
        HabitsCliError::Engine(e)
    }
}

impl From<serde_json::Error> for HabitsCliError {
    fn from(e: serde_json::Error) -> Self {
        HabitsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HabitsCliError> for CliError {
    fn from(e: HabitsCliError) -> Self {
        match e {
            HabitsCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            HabitsCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check day keys and input format".to_string()),
            },
            HabitsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HabitsCliError::HabitNotFound(name) => CliError {
                code: "HABIT_NOT_FOUND".to_string(),
                message: format!("No habit named '{}'", name),
                hint: Some("Run import first, or check the habit name".to_string()),
            },
        }
    }
}
