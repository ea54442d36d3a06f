//! Reshaping of extracted records into destination rows
//!
//! Everything here is pure: no I/O and no store access. Foreign keys that
//! need the store are left as `SongplayDraft`s for the loader to resolve.

pub mod log;
pub mod song;
pub mod time;

pub use log::{transform_log_events, LogBatch};
pub use song::{transform_song_record, SongBatch};
pub use time::time_row;
