use crate::config::SyncConfig;
use crate::model::StatsKeyScheme;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Re-fetch incomplete team stats until every file is valid.
    #[default]
    Reconcile,
    /// Write ranking, team details, and stats once.
    Snapshot,
    /// Rename stats files from the other key scheme to `--key-scheme`.
    Migrate,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Keep HLTV team ranking and stats JSON files up to date", long_about = None)]
pub struct Args {
    /// TOML file with defaults for any of the options below.
    #[arg(long, value_name = "CONFIG_TOML", value_parser = crate::args::validation::check_readable_file)]
    pub config_toml: Option<PathBuf>,
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<Mode>,
    /// Directory the JSON files are written under.
    #[arg(short = 'd', long, value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// How many ranked teams to track.
    #[arg(short = 'n', long, value_name = "TOP_N")]
    pub top_n: Option<usize>,
    /// Seconds to wait between reconcile cycles.
    #[arg(long, value_name = "DELAY_SECS")]
    pub delay_secs: Option<u64>,
    /// Upper bound on concurrent stats fetches.
    #[arg(short = 'f', long, value_name = "FANOUT")]
    pub fanout: Option<usize>,
    #[arg(short = 'k', long, value_enum)]
    pub key_scheme: Option<StatsKeyScheme>,
    /// Stop reconciling after this many cycles even if teams are still incomplete.
    #[arg(long, value_name = "MAX_CYCLES")]
    pub max_cycles: Option<u32>,
    #[arg(long, value_name = "BASE_URL")]
    pub base_url: Option<String>,
    /// Per-request HTTP timeout.
    #[arg(long, value_name = "TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub mode: Option<Mode>,
    pub data_dir: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub delay_secs: Option<u64>,
    pub fanout: Option<usize>,
    pub key_scheme: Option<StatsKeyScheme>,
    pub max_cycles: Option<u32>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub mode: Mode,
    pub data_dir: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    pub sync: SyncConfig,
}
