use crate::error::Result;
use crate::load::schema;
use crate::types::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

/// Row-level writes against the destination store
///
/// Every call runs inside whatever transaction the implementor holds;
/// nothing is visible to other readers until that transaction commits.
pub trait Loader {
    /// Insert a song, overwriting any row with the same `song_id`.
    fn upsert_song(&self, row: &SongRow) -> Result<()>;

    /// Insert an artist, overwriting any row with the same `artist_id`.
    fn upsert_artist(&self, row: &ArtistRow) -> Result<()>;

    /// Insert a user, overwriting any row with the same `user_id`.
    fn upsert_user(&self, row: &UserRow) -> Result<()>;

    /// Insert a time row unless its `start_time` is already present.
    fn insert_time_if_absent(&self, row: &TimeRow) -> Result<()>;

    /// Look up `(song_id, artist_id)` for an exact title, artist name and
    /// duration match. A miss is `(None, None)`, not an error.
    fn resolve_song_and_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<(Option<String>, Option<String>)>;

    /// Append a songplay. There is no natural key, so re-loading the same
    /// log appends the same plays again.
    fn insert_songplay(&self, row: &SongplayRow) -> Result<()>;
}

const SONG_UPSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT (song_id) DO UPDATE SET title = excluded.title, artist_id = excluded.artist_id, year = excluded.year, duration = excluded.duration";

const ARTIST_UPSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT (artist_id) DO UPDATE SET name = excluded.name, location = excluded.location, latitude = excluded.latitude, longitude = excluded.longitude";

const USER_UPSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT (user_id) DO UPDATE SET first_name = excluded.first_name, last_name = excluded.last_name, gender = excluded.gender, level = excluded.level";

const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
     ON CONFLICT (start_time) DO NOTHING";

const SONG_SELECT: &str = "SELECT songs.song_id, artists.artist_id FROM songs \
     JOIN artists ON songs.artist_id = artists.artist_id \
     WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3 \
     LIMIT 1";

const SONGPLAY_INSERT: &str = "INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// The destination SQLite database, open for the duration of a run
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    /// Create missing destination tables
    pub fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.conn)?;
        Ok(())
    }

    /// Start the transaction for one source file
    pub fn begin(&mut self) -> Result<StoreTx<'_>> {
        let tx = self.conn.transaction()?;
        Ok(StoreTx { tx })
    }

    /// Number of rows in `table`
    pub fn count(&self, table: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Writes for a single source file; rolled back on drop unless committed
pub struct StoreTx<'conn> {
    tx: Transaction<'conn>,
}

impl StoreTx<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl Loader for StoreTx<'_> {
    fn upsert_song(&self, row: &SongRow) -> Result<()> {
        self.tx.prepare_cached(SONG_UPSERT)?.execute(params![
            row.song_id,
            row.title,
            row.artist_id,
            row.year,
            row.duration
        ])?;
        Ok(())
    }

    fn upsert_artist(&self, row: &ArtistRow) -> Result<()> {
        self.tx.prepare_cached(ARTIST_UPSERT)?.execute(params![
            row.artist_id,
            row.name,
            row.location,
            row.latitude,
            row.longitude
        ])?;
        Ok(())
    }

    fn upsert_user(&self, row: &UserRow) -> Result<()> {
        self.tx.prepare_cached(USER_UPSERT)?.execute(params![
            row.user_id,
            row.first_name,
            row.last_name,
            row.gender,
            row.level
        ])?;
        Ok(())
    }

    fn insert_time_if_absent(&self, row: &TimeRow) -> Result<()> {
        self.tx.prepare_cached(TIME_INSERT)?.execute(params![
            row.start_time,
            row.hour,
            row.day,
            row.week,
            row.month,
            row.year,
            row.weekday
        ])?;
        Ok(())
    }

    fn resolve_song_and_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<(Option<String>, Option<String>)> {
        let found = self
            .tx
            .prepare_cached(SONG_SELECT)?
            .query_row(params![title, artist_name, duration], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .optional()?;

        Ok(match found {
            Some((song_id, artist_id)) => (Some(song_id), Some(artist_id)),
            None => (None, None),
        })
    }

    fn insert_songplay(&self, row: &SongplayRow) -> Result<()> {
        self.tx.prepare_cached(SONGPLAY_INSERT)?.execute(params![
            row.start_time,
            row.user_id,
            row.level,
            row.song_id,
            row.artist_id,
            row.session_id,
            row.location,
            row.user_agent
        ])?;
        Ok(())
    }
}
