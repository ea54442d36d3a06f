use crate::error::{EtlError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What the driver does when a single file fails to extract or load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failing file
    #[default]
    Abort,
    /// Roll back the failing file, record it and move on to the next one
    SkipFile,
}

/// Rendering of the `start_time` key shared by the time and songplay tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
pub enum TimeFormat {
    /// `YYYY-MM-DD HH:MM:SS`, hour 00-23
    #[default]
    #[serde(rename = "24h")]
    #[value(name = "24h")]
    TwentyFourHour,
    /// `YYYY-MM-DD hh:MM:SS`, hour 01-12 with no AM/PM marker.
    ///
    /// Only useful for appending to a store that was populated with this
    /// format; morning and evening plays collide on the same key.
    #[serde(rename = "legacy_12h")]
    #[value(name = "legacy_12h")]
    Legacy12Hour,
}

impl TimeFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "%Y-%m-%d %H:%M:%S",
            TimeFormat::Legacy12Hour => "%Y-%m-%d %I:%M:%S",
        }
    }
}

/// Configuration for a load run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    /// SQLite database file
    pub database: PathBuf,

    /// Root of the per-track metadata files
    pub song_data: PathBuf,

    /// Root of the per-session event logs
    pub log_data: PathBuf,

    /// File extension (without the dot) that marks a source file
    pub extension: String,

    pub on_error: FailurePolicy,

    pub time_format: TimeFormat,

    /// Create missing tables before loading
    pub create_schema: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            database: PathBuf::from("playlog.db"),
            song_data: PathBuf::from("data/song_data"),
            log_data: PathBuf::from("data/log_data"),
            extension: String::from("json"),
            on_error: FailurePolicy::Abort,
            time_format: TimeFormat::TwentyFourHour,
            create_schema: true,
        }
    }
}

impl EtlConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EtlConfig = toml::from_str(s).map_err(|e| EtlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Extension with any leading dot removed
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    pub fn validate(&self) -> Result<()> {
        if self.extension().is_empty() {
            return Err(EtlError::Config("extension must not be empty".to_string()));
        }
        Ok(())
    }
}
