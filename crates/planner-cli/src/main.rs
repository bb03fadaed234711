//! `planner` CLI — record time-blocked tasks and list the free time they leave.
//!
//! ## Usage
//!
//! ```sh
//! # Interactive menu (default)
//! planner
//!
//! # Add a task
//! planner add --date 2026-03-02 --start 10:00 --end 11:00 --title "Dentist"
//!
//! # Tasks and free windows for the next 14 days
//! planner list
//! planner free
//!
//! # Free windows with overlapping tasks merged first, over one week
//! planner free --merge-overlaps --days 7
//!
//! # Delete the first task listed on a date
//! planner delete --date 2026-03-02 --index 0
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use planner_engine::{JsonFileStorage, LoadOutcome, Planner, TaskDraft};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod menu;
mod presenter;

use config::{load_config, Overrides, Settings, MAX_HORIZON_DAYS};
use input::{parse_date, parse_time};

#[derive(Parser)]
#[command(
    name = "planner",
    version,
    about = "Personal task calendar with free time windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to <config dir>/planner/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Calendar data file (default: ./calendar_data.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Start of the daily active window, HH:MM
    #[arg(long, global = true, value_parser = parse_time)]
    wake: Option<NaiveTime>,

    /// End of the daily active window, HH:MM
    #[arg(long, global = true, value_parser = parse_time)]
    sleep: Option<NaiveTime>,

    /// Number of days to list, starting today
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_HORIZON_DAYS))
    )]
    days: Option<u32>,

    /// Merge overlapping tasks before computing free windows
    #[arg(long, global = true)]
    merge_overlaps: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu
    Menu,
    /// Add a task
    Add {
        /// Date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Start time, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time, HH:MM
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Task name
        #[arg(long)]
        title: String,
    },
    /// List tasks over the horizon
    List,
    /// List free time windows over the horizon
    Free,
    /// Delete a task by date and its index in that date's listing
    Delete {
        /// Date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Index shown by `planner list`
        #[arg(long)]
        index: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = load_config(cli.config.as_deref())?;
    let overrides = Overrides {
        data: cli.data,
        wake: cli.wake,
        sleep: cli.sleep,
        days: cli.days,
        merge_overlaps: cli.merge_overlaps,
        today: cli.today,
    };
    let settings = Settings::resolve(cfg, overrides, Local::now().date_naive())?;
    debug!(?settings, "resolved settings");

    let storage = JsonFileStorage::new(&settings.data_file);
    let (planner, outcome) = match Planner::open(settings.window, storage) {
        Ok(opened) => opened,
        Err(e) => {
            error!(error = %e, path = %settings.data_file.display(), "failed to load calendar");
            return Err(e).with_context(|| {
                format!(
                    "Failed to load calendar from {} (fix or move the file to start fresh)",
                    settings.data_file.display()
                )
            });
        }
    };
    if let LoadOutcome::Restored { tasks } = outcome {
        debug!(tasks, "calendar loaded");
    }
    let mut planner = planner.with_policy(settings.policy);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            menu::Menu::new(
                &mut planner,
                settings.today,
                settings.days,
                stdin.lock(),
                io::stdout(),
            )
            .run()?;
        }
        Commands::Add {
            date,
            start,
            end,
            title,
        } => {
            planner
                .add_task(TaskDraft::on(date, start, end, title))
                .context("Failed to add task")?;
            println!("Task added successfully!");
        }
        Commands::List => {
            let agenda = planner.agenda(settings.today, settings.days);
            print!("{}", presenter::calendar(&agenda));
        }
        Commands::Free => {
            let windows = planner.free_windows(settings.today, settings.days);
            print!("{}", presenter::windows(&windows));
        }
        Commands::Delete { date, index } => {
            match planner
                .delete_task(date, index)
                .context("Failed to delete task")?
            {
                Some(task) => println!("Task deleted successfully! ({})", task.title),
                None => bail!("No task with index {} on {}", index, date),
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so tables on stdout stay clean.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "planner=debug,planner_engine=debug"
    } else {
        "planner=warn,planner_engine=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}
