mod types;
mod validation;

pub use types::{Args, CleanArgs, FileConfig, Mode};
pub use validation::check_readable_file;

use crate::config::{
    DEFAULT_DATA_DIR, DEFAULT_DELAY, DEFAULT_FANOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOP_N,
    HLTV_BASE_URL, SyncConfig,
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// # Errors
///
/// Will return `Err` if the config file cannot be read or the merged options are invalid
pub fn args_checks() -> Result<CleanArgs> {
    load_config(Args::parse())
}

/// Merges command line options over the TOML file over built-in defaults.
///
/// # Errors
///
/// Will return `Err` if the config file cannot be read or the merged options are invalid
pub fn load_config(cli: Args) -> Result<CleanArgs> {
    let file_config = match cli.config_toml.as_ref() {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config toml {}", path.display()))?;
            toml::from_str::<FileConfig>(&contents)
                .with_context(|| format!("parse config toml {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    let defaults = SyncConfig::default();
    let sync = SyncConfig {
        top_n: cli.top_n.or(file_config.top_n).unwrap_or(DEFAULT_TOP_N),
        delay: cli
            .delay_secs
            .or(file_config.delay_secs)
            .map_or(DEFAULT_DELAY, Duration::from_secs),
        fanout: cli.fanout.or(file_config.fanout).unwrap_or(DEFAULT_FANOUT),
        key_scheme: cli
            .key_scheme
            .or(file_config.key_scheme)
            .unwrap_or_default(),
        max_cycles: cli.max_cycles.or(file_config.max_cycles),
        ..defaults
    };

    let clean = CleanArgs {
        mode: cli.mode.or(file_config.mode).unwrap_or_default(),
        data_dir: cli
            .data_dir
            .or(file_config.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        base_url: cli
            .base_url
            .or(file_config.base_url)
            .unwrap_or_else(|| HLTV_BASE_URL.to_string()),
        timeout: cli
            .timeout_secs
            .or(file_config.timeout_secs)
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
        sync,
    };

    clean.validate().map_err(|e| anyhow!(e))?;
    Ok(clean)
}
