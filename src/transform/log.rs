use crate::config::TimeFormat;
use crate::error::{EtlError, Result};
use crate::transform::time::time_row;
use crate::types::{LogEvent, SongplayDraft, TimeRow, UserRow};
use std::collections::HashSet;
use std::path::Path;

/// Rows derived from one session log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBatch {
    /// One per distinct `start_time`, first occurrence kept
    pub times: Vec<TimeRow>,
    /// One per distinct non-empty user id, first occurrence kept
    pub users: Vec<UserRow>,
    /// One per song play, in file order
    pub songplays: Vec<SongplayDraft>,
}

/// Turn a session log into time, user and songplay rows.
///
/// Only `NextSong` events survive; everything else is page navigation. A
/// timestamp chrono cannot represent is reported as a parse error against
/// `path`.
pub fn transform_log_events(
    events: Vec<LogEvent>,
    format: TimeFormat,
    path: &Path,
) -> Result<LogBatch> {
    let mut batch = LogBatch::default();
    let mut seen_times = HashSet::new();
    let mut seen_users = HashSet::new();

    for event in events.into_iter().filter(LogEvent::is_song_play) {
        let time = time_row(event.ts, format).ok_or_else(|| {
            EtlError::parse(path, None, format!("timestamp out of range: {}", event.ts))
        })?;

        if !event.user_id.is_empty() && seen_users.insert(event.user_id.clone()) {
            batch.users.push(UserRow {
                user_id: event.user_id.clone(),
                first_name: event.first_name.clone(),
                last_name: event.last_name.clone(),
                gender: event.gender.clone(),
                level: event.level.clone(),
            });
        }

        batch.songplays.push(SongplayDraft {
            start_time: time.start_time.clone(),
            user_id: event.user_id,
            level: event.level,
            song: event.song,
            artist: event.artist,
            length: event.length,
            session_id: event.session_id,
            location: event.location,
            user_agent: event.user_agent,
        });

        if seen_times.insert(time.start_time.clone()) {
            batch.times.push(time);
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> LogEvent {
        serde_json::from_value(value).unwrap()
    }

    fn play(ts: i64, user_id: &str, level: &str) -> LogEvent {
        event(json!({
            "page": "NextSong", "ts": ts, "song": "T", "artist": "N", "length": 180.5,
            "userId": user_id, "firstName": "Jo", "lastName": "Do", "gender": "F",
            "level": level, "sessionId": 9, "location": "X", "userAgent": "UA"
        }))
    }

    fn transform(events: Vec<LogEvent>) -> LogBatch {
        transform_log_events(events, TimeFormat::TwentyFourHour, Path::new("log.json")).unwrap()
    }

    #[test]
    fn test_only_song_plays_survive() {
        let events = vec![
            event(json!({"page": "Home", "ts": 1541121000000i64, "userId": "10"})),
            play(1541121934796, "10", "free"),
            event(json!({"page": "Logout", "ts": 1541122000000i64, "userId": "10"})),
            play(1541122134796, "10", "free"),
        ];

        let batch = transform(events);

        assert_eq!(batch.songplays.len(), 2);
        assert_eq!(batch.times.len(), 2);
        assert_eq!(batch.songplays[0].start_time, "2018-11-02 01:25:34");
        assert_eq!(batch.songplays[1].start_time, "2018-11-02 01:28:54");
    }

    #[test]
    fn test_users_deduplicated_first_seen() {
        let events = vec![
            play(1541121934796, "10", "free"),
            play(1541122134796, "10", "paid"),
            play(1541122334796, "26", "paid"),
        ];

        let batch = transform(events);

        assert_eq!(batch.users.len(), 2);
        assert_eq!(batch.users[0].user_id, "10");
        assert_eq!(batch.users[0].level.as_deref(), Some("free"));
        assert_eq!(batch.users[1].user_id, "26");

        // Songplays are never deduplicated and keep their own level
        assert_eq!(batch.songplays.len(), 3);
        assert_eq!(batch.songplays[1].level.as_deref(), Some("paid"));
    }

    #[test]
    fn test_empty_user_id_dropped_from_users_only() {
        let events = vec![play(1541121934796, "", "free")];

        let batch = transform(events);

        assert!(batch.users.is_empty());
        assert_eq!(batch.songplays.len(), 1);
        assert_eq!(batch.songplays[0].user_id, "");
    }

    #[test]
    fn test_repeated_timestamp_yields_one_time_row() {
        let events = vec![
            play(1541121934796, "10", "free"),
            play(1541121934100, "26", "free"),
        ];

        let batch = transform(events);

        // Same second, so the same start_time key
        assert_eq!(batch.times.len(), 1);
        assert_eq!(batch.songplays.len(), 2);
    }

    #[test]
    fn test_no_events() {
        let batch = transform(vec![]);
        assert_eq!(batch, LogBatch::default());
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let events = vec![play(i64::MAX, "10", "free")];
        let err = transform_log_events(events, TimeFormat::TwentyFourHour, Path::new("log.json"))
            .unwrap_err();

        assert!(matches!(err, EtlError::Parse { .. }));
    }
}
