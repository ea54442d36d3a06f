//! Writing transformed rows into the relational store
//!
//! `Loader` is the row-level contract; `SqliteStore` hands out one
//! `StoreTx` per source file so a file either lands completely or not at all.

pub mod schema;
pub mod store;

pub use schema::ensure_schema;
pub use store::{Loader, SqliteStore, StoreTx};

use crate::error::Result;
use crate::transform::{LogBatch, SongBatch};
use std::ops::AddAssign;

/// Rows written for one file, or summed across a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub songs: u64,
    pub artists: u64,
    pub users: u64,
    pub times: u64,
    pub songplays: u64,
    /// Songplays stored without a song/artist match
    pub unresolved: u64,
}

impl AddAssign for RowCounts {
    fn add_assign(&mut self, other: RowCounts) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.users += other.users;
        self.times += other.times;
        self.songplays += other.songplays;
        self.unresolved += other.unresolved;
    }
}

/// Upsert the song and artist derived from one song file
pub fn load_song_batch<L: Loader + ?Sized>(loader: &L, batch: &SongBatch) -> Result<RowCounts> {
    loader.upsert_song(&batch.song)?;
    loader.upsert_artist(&batch.artist)?;

    Ok(RowCounts {
        songs: 1,
        artists: 1,
        ..RowCounts::default()
    })
}

/// Write the rows derived from one session log.
///
/// Songplays are resolved against whatever songs and artists the store
/// already holds; a play with no match is stored with null keys.
pub fn load_log_batch<L: Loader + ?Sized>(loader: &L, batch: LogBatch) -> Result<RowCounts> {
    let mut counts = RowCounts::default();

    for time in &batch.times {
        loader.insert_time_if_absent(time)?;
        counts.times += 1;
    }

    for user in &batch.users {
        loader.upsert_user(user)?;
        counts.users += 1;
    }

    for draft in batch.songplays {
        let (song_id, artist_id) = match (&draft.song, &draft.artist, draft.length) {
            (Some(song), Some(artist), Some(length)) => {
                loader.resolve_song_and_artist(song, artist, length)?
            }
            _ => (None, None),
        };

        if song_id.is_none() {
            tracing::trace!(
                "no catalog match for {:?} by {:?} ({:?}s)",
                draft.song,
                draft.artist,
                draft.length
            );
            counts.unresolved += 1;
        }

        loader.insert_songplay(&draft.resolve(song_id, artist_id))?;
        counts.songplays += 1;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArtistRow, SongRow, SongplayDraft, TimeRow, UserRow};

    fn catalog() -> SongBatch {
        SongBatch {
            song: SongRow {
                song_id: "S1".to_string(),
                title: "T".to_string(),
                artist_id: "A1".to_string(),
                year: 2000,
                duration: 180.5,
            },
            artist: ArtistRow {
                artist_id: "A1".to_string(),
                name: "N".to_string(),
                location: Some("L".to_string()),
                latitude: Some(1.0),
                longitude: Some(2.0),
            },
        }
    }

    fn draft(song: Option<&str>, length: Option<f64>) -> SongplayDraft {
        SongplayDraft {
            start_time: "2018-11-02 01:25:34".to_string(),
            user_id: "10".to_string(),
            level: Some("free".to_string()),
            song: song.map(str::to_string),
            artist: Some("N".to_string()),
            length,
            session_id: Some(9),
            location: Some("X".to_string()),
            user_agent: Some("UA".to_string()),
        }
    }

    #[test]
    fn test_log_batch_resolves_against_catalog() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();

        let tx = store.begin().unwrap();
        load_song_batch(&tx, &catalog()).unwrap();

        let batch = LogBatch {
            times: vec![TimeRow {
                start_time: "2018-11-02 01:25:34".to_string(),
                hour: 1,
                day: 2,
                week: 44,
                month: 11,
                year: 2018,
                weekday: 4,
            }],
            users: vec![UserRow {
                user_id: "10".to_string(),
                first_name: Some("Jo".to_string()),
                last_name: Some("Do".to_string()),
                gender: Some("F".to_string()),
                level: Some("free".to_string()),
            }],
            songplays: vec![
                draft(Some("T"), Some(180.5)),
                draft(Some("Unknown"), Some(180.5)),
                draft(None, None),
            ],
        };

        let counts = load_log_batch(&tx, batch).unwrap();
        tx.commit().unwrap();

        assert_eq!(
            counts,
            RowCounts {
                songs: 0,
                artists: 0,
                users: 1,
                times: 1,
                songplays: 3,
                unresolved: 2,
            }
        );

        let resolved: i64 = store
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM songplays WHERE song_id = 'S1' AND artist_id = 'A1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(resolved, 1);
    }

    #[test]
    fn test_row_counts_add() {
        let mut total = RowCounts::default();
        total += RowCounts {
            songs: 1,
            artists: 1,
            ..RowCounts::default()
        };
        total += RowCounts {
            songplays: 4,
            unresolved: 1,
            ..RowCounts::default()
        };

        assert_eq!(total.songs, 1);
        assert_eq!(total.songplays, 4);
        assert_eq!(total.unresolved, 1);
    }
}
