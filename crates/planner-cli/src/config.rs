//! Optional TOML configuration and its merge with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use planner_engine::{DayWindow, GapPolicy, DEFAULT_HORIZON_DAYS};
use serde::Deserialize;
use tracing::debug;

use crate::input::parse_time;

pub const DEFAULT_DATA_FILE: &str = "calendar_data.json";

/// Upper bound on the listing horizon, roughly ten years.
pub const MAX_HORIZON_DAYS: u32 = 3660;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `HH:MM`
    pub wake_time: String,
    /// `HH:MM`
    pub sleep_time: String,
    pub horizon_days: u32,
    /// Relative paths resolve against the working directory.
    pub data_file: PathBuf,
    pub merge_overlaps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wake_time: "09:00".to_string(),
            sleep_time: "22:00".to_string(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            merge_overlaps: false,
        }
    }
}

/// `<config dir>/planner/config.toml`, e.g. `~/.config/planner/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("planner").join("config.toml"))
}

/// Load the explicit config file, else the default one if it exists, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let s = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("Failed to parse config: {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub wake: Option<NaiveTime>,
    pub sleep: Option<NaiveTime>,
    pub days: Option<u32>,
    pub merge_overlaps: bool,
    pub today: Option<NaiveDate>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub window: DayWindow,
    pub policy: GapPolicy,
    pub days: u32,
    pub data_file: PathBuf,
    pub today: NaiveDate,
}

impl Settings {
    pub fn resolve(cfg: Config, overrides: Overrides, today: NaiveDate) -> Result<Self> {
        let wake = match overrides.wake {
            Some(t) => t,
            None => parse_time(&cfg.wake_time)
                .map_err(|e| anyhow!("Invalid wake_time in config: {e}"))?,
        };
        let sleep = match overrides.sleep {
            Some(t) => t,
            None => parse_time(&cfg.sleep_time)
                .map_err(|e| anyhow!("Invalid sleep_time in config: {e}"))?,
        };
        let window = DayWindow::new(wake, sleep)?;

        let policy = if overrides.merge_overlaps || cfg.merge_overlaps {
            GapPolicy::MergeOverlaps
        } else {
            GapPolicy::AsRecorded
        };

        let days = overrides.days.unwrap_or(cfg.horizon_days);
        if days > MAX_HORIZON_DAYS {
            bail!("horizon_days must be at most {MAX_HORIZON_DAYS}, got {days}");
        }

        Ok(Self {
            window,
            policy,
            days,
            data_file: overrides.data.unwrap_or(cfg.data_file),
            today: overrides.today.unwrap_or(today),
        })
    }
}
