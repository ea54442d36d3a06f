use rusqlite::Connection;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

pub const SONGS_TABLE: Table = Table {
    name: "songs",
    schema: "CREATE TABLE IF NOT EXISTS songs (song_id TEXT NOT NULL, title TEXT NOT NULL, artist_id TEXT NOT NULL, year INTEGER, duration REAL NOT NULL, PRIMARY KEY (song_id));",
    indices: &["CREATE INDEX IF NOT EXISTS songs_title_index ON songs (title);"],
};
pub const ARTISTS_TABLE: Table = Table {
    name: "artists",
    schema: "CREATE TABLE IF NOT EXISTS artists (artist_id TEXT NOT NULL, name TEXT NOT NULL, location TEXT, latitude REAL, longitude REAL, PRIMARY KEY (artist_id));",
    indices: &["CREATE INDEX IF NOT EXISTS artists_name_index ON artists (name);"],
};
pub const USERS_TABLE: Table = Table {
    name: "users",
    schema: "CREATE TABLE IF NOT EXISTS users (user_id TEXT NOT NULL, first_name TEXT, last_name TEXT, gender TEXT, level TEXT, PRIMARY KEY (user_id));",
    indices: &[],
};
pub const TIME_TABLE: Table = Table {
    name: "time",
    schema: "CREATE TABLE IF NOT EXISTS time (start_time TEXT NOT NULL, hour INTEGER NOT NULL, day INTEGER NOT NULL, week INTEGER NOT NULL, month INTEGER NOT NULL, year INTEGER NOT NULL, weekday INTEGER NOT NULL, PRIMARY KEY (start_time));",
    indices: &[],
};
// No foreign key constraints: song_id and artist_id are NULL on a lookup miss
pub const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    schema: "CREATE TABLE IF NOT EXISTS songplays (songplay_id INTEGER PRIMARY KEY, start_time TEXT NOT NULL, user_id TEXT NOT NULL, level TEXT, song_id TEXT, artist_id TEXT, session_id INTEGER, location TEXT, user_agent TEXT);",
    indices: &["CREATE INDEX IF NOT EXISTS songplays_start_time_index ON songplays (start_time);"],
};

pub const TABLES: &[Table] = &[
    SONGS_TABLE,
    ARTISTS_TABLE,
    USERS_TABLE,
    TIME_TABLE,
    SONGPLAYS_TABLE,
];

/// Create any of the destination tables that do not exist yet.
///
/// Existing tables are left untouched.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    for table in TABLES {
        conn.execute(table.schema, [])?;
        for index in table.indices {
            conn.execute(index, [])?;
        }
    }
    Ok(())
}
