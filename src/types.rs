use serde::{Deserialize, Deserializer};

/// One per-track metadata file, as it appears on disk
///
/// Every field must be present; the artist location and coordinates may be
/// `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    #[serde(deserialize_with = "present_or_null")]
    pub artist_location: Option<String>,
    #[serde(deserialize_with = "present_or_null")]
    pub artist_latitude: Option<f64>,
    #[serde(deserialize_with = "present_or_null")]
    pub artist_longitude: Option<f64>,
    pub year: i32,
    pub duration: f64,
}

/// One line of a session event log
///
/// Only `page` and `ts` are required. Non-play pages routinely carry nulls
/// for the song and user fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub page: String,
    /// Epoch milliseconds, UTC
    pub ts: i64,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Track length in seconds
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LogEvent {
    pub const NEXT_SONG: &'static str = "NextSong";

    /// Whether this event is an actual track play
    pub fn is_song_play(&self) -> bool {
        self.page == Self::NEXT_SONG
    }
}

/// Like `Option<T>`'s own impl, but without serde's implicit default, so
/// a missing key still fails.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// User ids show up both as strings and as bare integers; null means anonymous.
fn lenient_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s.trim().to_string(),
        Some(RawId::Int(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Row of the `songs` table
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// Row of the `artists` table
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row of the `users` table
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the `time` table, keyed by the formatted `start_time`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: String,
    pub hour: u32,
    pub day: u32,
    /// ISO-8601 week number
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Monday = 0 .. Sunday = 6
    pub weekday: u32,
}

/// A songplay before its song/artist foreign keys are looked up
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayDraft {
    pub start_time: String,
    pub user_id: String,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongplayDraft {
    /// Attach the looked-up keys; `None` on either side is a resolution miss.
    pub fn resolve(self, song_id: Option<String>, artist_id: Option<String>) -> SongplayRow {
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level,
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location,
            user_agent: self.user_agent,
        }
    }
}

/// Row of the `songplays` table
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub start_time: String,
    pub user_id: String,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
