//! Sequential driver: discover, then extract, transform, load and commit
//! one file at a time.

use crate::config::{EtlConfig, FailurePolicy, TimeFormat};
use crate::error::Result;
use crate::extractor::{extract_log_file, extract_song_file, SourceKind};
use crate::load::{load_log_batch, load_song_batch, RowCounts, SqliteStore};
use crate::locator::find_files;
use crate::transform::{transform_log_events, transform_song_record, LogBatch, SongBatch};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file that was rolled back and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of loading every file under one root
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub kind: SourceKind,
    pub root: PathBuf,
    pub files_found: usize,
    pub files_loaded: usize,
    pub failed: Vec<FailedFile>,
    pub rows: RowCounts,
}

/// Summaries for a full run, song files first
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub songs: RunSummary,
    pub logs: RunSummary,
}

enum Batch {
    Song(SongBatch),
    Log(LogBatch),
}

/// Drives files through extract, transform and load against one store
pub struct Pipeline<'a> {
    store: &'a mut SqliteStore,
    extension: String,
    on_error: FailurePolicy,
    time_format: TimeFormat,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a mut SqliteStore, config: &EtlConfig) -> Self {
        Pipeline {
            store,
            extension: config.extension().to_string(),
            on_error: config.on_error,
            time_format: config.time_format,
        }
    }

    /// Load the song catalog, then the event logs that reference it
    pub fn run(&mut self, song_root: &Path, log_root: &Path) -> Result<RunReport> {
        let songs = self.process_data(song_root, SourceKind::Song)?;
        let logs = self.process_data(log_root, SourceKind::Log)?;
        Ok(RunReport { songs, logs })
    }

    /// Load every matching file under `root`, committing after each one.
    ///
    /// Under `FailurePolicy::Abort` the first failure is returned and the
    /// failing file leaves nothing behind; files committed before it stay.
    pub fn process_data(&mut self, root: &Path, kind: SourceKind) -> Result<RunSummary> {
        let files = find_files(root, &self.extension)?;
        let total = files.len();
        info!("{} files found in {}", total, root.display());

        let mut summary = RunSummary {
            kind,
            root: root.to_path_buf(),
            files_found: total,
            files_loaded: 0,
            failed: Vec::new(),
            rows: RowCounts::default(),
        };

        for (i, path) in files.iter().enumerate() {
            match self.process_file(path, kind) {
                Ok(counts) => {
                    summary.files_loaded += 1;
                    summary.rows += counts;
                    info!("{}/{} files processed.", i + 1, total);
                }
                Err(e) if self.on_error == FailurePolicy::SkipFile && e.is_file_scoped() => {
                    warn!("Skipping {}: {}", path.display(), e);
                    summary.failed.push(FailedFile {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Extract, transform and load a single file in its own transaction
    pub fn process_file(&mut self, path: &Path, kind: SourceKind) -> Result<RowCounts> {
        let batch = match kind {
            SourceKind::Song => Batch::Song(transform_song_record(extract_song_file(path)?)),
            SourceKind::Log => {
                let events = extract_log_file(path)?;
                Batch::Log(transform_log_events(events, self.time_format, path)?)
            }
        };

        let tx = self.store.begin()?;
        let counts = match batch {
            Batch::Song(batch) => load_song_batch(&tx, &batch)?,
            Batch::Log(batch) => load_log_batch(&tx, batch)?,
        };
        tx.commit()?;

        debug!("{} {} -> {:?}", kind.label(), path.display(), counts);
        Ok(counts)
    }
}
