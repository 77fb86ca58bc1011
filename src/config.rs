// config.rs

use std::path::PathBuf;

use clap::Parser;

const APP_DIR: &str = "keypad-calc";

#[derive(Parser, Debug)]
#[command(name = "keypad-calc", version, about = "Keypad calculator with a persisted history")]
pub struct Cli {
    /// Directory the history is stored in.
    #[arg(long, env = "CALC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep history in memory only.
    #[arg(long, conflicts_with = "data_dir")]
    pub ephemeral: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Disk(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageLocation,
    pub log_level: String,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        let storage = if cli.ephemeral {
            StorageLocation::Memory
        } else {
            StorageLocation::Disk(cli.data_dir.unwrap_or_else(default_data_dir))
        };
        Self {
            storage,
            log_level: cli.log_level,
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(base) => base.join(APP_DIR),
        None => PathBuf::from(format!(".{}", APP_DIR)),
    }
}
