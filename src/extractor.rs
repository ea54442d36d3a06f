use crate::error::{EtlError, Result};
use crate::types::{LogEvent, SongRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Which family of source file a root holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// One JSON object per file describing a song and its artist
    Song,
    /// Newline-delimited JSON events from one session log
    Log,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Song => "song",
            SourceKind::Log => "log",
        }
    }
}

/// Read one per-track metadata file
pub fn extract_song_file(path: &Path) -> Result<SongRecord> {
    let content = std::fs::read(path).map_err(|e| EtlError::io(path, e))?;
    parse_song_record(content, path)
}

/// Decode a song record from raw file bytes.
///
/// `path` is only used to label errors.
pub fn parse_song_record(mut content: Vec<u8>, path: &Path) -> Result<SongRecord> {
    // simd-json parses in place and wants a mutable buffer
    simd_json::serde::from_slice::<SongRecord>(&mut content)
        .map_err(|e| EtlError::parse(path, None, e))
}

/// Read one session event log
pub fn extract_log_file(path: &Path) -> Result<Vec<LogEvent>> {
    let file = File::open(path).map_err(|e| EtlError::io(path, e))?;
    parse_log_events(BufReader::new(file), path)
}

/// Decode newline-delimited events, preserving file order.
///
/// Blank lines are skipped. The first line that fails to decode aborts the
/// whole file so nothing from a half-understood log reaches the store.
pub fn parse_log_events<R: BufRead>(reader: R, path: &Path) -> Result<Vec<LogEvent>> {
    let mut events = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EtlError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: LogEvent =
            serde_json::from_str(line).map_err(|e| EtlError::parse(path, Some(idx + 1), e))?;
        events.push(event);
    }

    Ok(events)
}
