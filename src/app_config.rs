use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::charset;

/// Application configuration module
/// This module handles loading and validating conversion settings.
/// Every field has a default so a partial `conf.json` is accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Signed shift applied to cue times, in milliseconds
    #[serde(default)]
    pub time_offset_ms: i64,

    /// Only cues starting at or after this time are shifted
    #[serde(default)]
    pub time_begin_ms: u64,

    /// Leave existing output files untouched
    #[serde(default)]
    pub no_overwrite: bool,

    /// Source encoding label; auto-detected when absent
    #[serde(default)]
    pub encoding: Option<String>,

    /// Extensions picked up when converting a directory
    #[serde(default = "default_directory_extensions")]
    pub directory_extensions: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_directory_extensions() -> Vec<String> {
    vec!["smi".to_string(), "smil".to_string()]
}

/// File name looked up in the per-user configuration directory
pub const CONFIG_FILE_NAME: &str = "conf.json";

const APP_DIR_NAME: &str = "smi2srt";

impl Config {
    /// Load configuration from `path`, then from the user configuration
    /// directory, falling back to defaults. No file is ever created.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            return Self::from_file(path);
        }

        if let Some(user_path) = Self::user_config_path().filter(|p| p.exists()) {
            return Self::from_file(&user_path);
        }

        debug!("No config file at '{}', using defaults", path.display());
        Ok(Config::default())
    }

    /// Parse one JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// `<config_dir>/smi2srt/conf.json`, when the platform has a config dir
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(label) = &self.encoding {
            if charset::resolve_encoding_label(label).is_none() {
                return Err(anyhow!("Unknown encoding label: {}", label));
            }
        }

        if self.directory_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(anyhow!("directory_extensions must list at least one extension"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            time_offset_ms: 0,
            time_begin_ms: 0,
            no_overwrite: false,
            encoding: None,
            directory_extensions: default_directory_extensions(),
            log_level: LogLevel::default(),
        }
    }
}
