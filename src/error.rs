//! Error taxonomy for the load pipeline
//!
//! A song/artist lookup that finds nothing is not an error: it surfaces as
//! `None` foreign keys on the songplay row.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while discovering, parsing or loading source files
#[derive(Debug, Error)]
pub enum EtlError {
    /// Source root is missing or not a readable directory
    #[error("cannot walk {}: {reason}", .path.display())]
    Discovery { path: PathBuf, reason: String },

    /// Malformed JSON or a missing required field
    #[error("{}{}: {message}", .path.display(), .line.map(|l| format!(":{}", l)).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Constraint violation, query failure or lost connection
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;

impl EtlError {
    pub(crate) fn parse(path: &Path, line: Option<usize>, message: impl ToString) -> Self {
        EtlError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error is confined to a single source file.
    ///
    /// File-scoped errors may be skipped under `FailurePolicy::SkipFile`;
    /// discovery and configuration errors always halt the run.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            EtlError::Parse { .. } | EtlError::Io { .. } | EtlError::Store(_)
        )
    }
}
