//! # Playlog - Listening Log Loader
//!
//! Loads two families of JSON documents into a relational store:
//! per-track metadata files (one JSON object each) and per-session event
//! logs (newline-delimited JSON).
//!
//! ## Modules
//!
//! - **locator**: recursive discovery of source files
//! - **extractor**: typed decoding of song files and event logs
//! - **transform**: reshaping into songs, artists, users, time and songplays
//! - **load**: idempotent upserts and foreign-key lookups against SQLite
//! - **pipeline**: per-file extract → transform → load → commit
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playlog::{EtlConfig, Pipeline, SqliteStore};
//!
//! # fn main() -> playlog::Result<()> {
//! let config = EtlConfig::default();
//! let mut store = SqliteStore::open(&config.database)?;
//! store.ensure_schema()?;
//!
//! let report = Pipeline::new(&mut store, &config).run(&config.song_data, &config.log_data)?;
//! println!("{} songplays loaded", report.logs.rows.songplays);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod load;
pub mod locator;
pub mod pipeline;
pub mod transform;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{EtlConfig, FailurePolicy, TimeFormat};
pub use error::{EtlError, Result};
pub use extractor::SourceKind;
pub use load::{Loader, RowCounts, SqliteStore};
pub use pipeline::{FailedFile, Pipeline, RunReport, RunSummary};

/// Main entry point: open the configured store and load both data roots.
///
/// The connection is closed when this returns, whether or not the run
/// succeeded.
pub fn run(config: &EtlConfig) -> Result<RunReport> {
    config.validate()?;

    let mut store = SqliteStore::open(&config.database)?;
    if config.create_schema {
        store.ensure_schema()?;
    }

    Pipeline::new(&mut store, config).run(&config.song_data, &config.log_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_against_database_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();
        fs::write(
            dir.path().join("song_data/TRAAA.json"),
            r#"{"song_id":"S1","title":"T","artist_id":"A1","artist_name":"N","artist_location":null,"artist_latitude":null,"artist_longitude":null,"year":0,"duration":99.0}"#,
        )
        .unwrap();

        let config = EtlConfig {
            database: dir.path().join("plays.db"),
            song_data: dir.path().join("song_data"),
            log_data: dir.path().join("log_data"),
            ..EtlConfig::default()
        };

        let report = run(&config).unwrap();
        assert_eq!(report.songs.files_loaded, 1);
        assert_eq!(report.logs.files_found, 0);

        // Reopening sees the committed rows
        let store = SqliteStore::open(&config.database).unwrap();
        assert_eq!(store.count("songs").unwrap(), 1);
        assert_eq!(store.count("artists").unwrap(), 1);
    }
}
