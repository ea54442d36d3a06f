use crate::types::{ArtistRow, SongRecord, SongRow};

/// Rows derived from one song file
#[derive(Debug, Clone, PartialEq)]
pub struct SongBatch {
    pub song: SongRow,
    pub artist: ArtistRow,
}

/// Split a song record into its song and artist rows.
pub fn transform_song_record(record: SongRecord) -> SongBatch {
    let song = SongRow {
        song_id: record.song_id,
        title: record.title,
        artist_id: record.artist_id.clone(),
        year: record.year,
        duration: record.duration,
    };

    let artist = ArtistRow {
        artist_id: record.artist_id,
        name: record.artist_name,
        location: record.artist_location,
        latitude: record.artist_latitude,
        longitude: record.artist_longitude,
    };

    SongBatch { song, artist }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        let record = SongRecord {
            song_id: "S1".to_string(),
            title: "T".to_string(),
            artist_id: "A1".to_string(),
            artist_name: "N".to_string(),
            artist_location: Some("L".to_string()),
            artist_latitude: Some(1.0),
            artist_longitude: Some(2.0),
            year: 2000,
            duration: 180.5,
        };

        let batch = transform_song_record(record);

        assert_eq!(
            batch.song,
            SongRow {
                song_id: "S1".to_string(),
                title: "T".to_string(),
                artist_id: "A1".to_string(),
                year: 2000,
                duration: 180.5,
            }
        );
        assert_eq!(
            batch.artist,
            ArtistRow {
                artist_id: "A1".to_string(),
                name: "N".to_string(),
                location: Some("L".to_string()),
                latitude: Some(1.0),
                longitude: Some(2.0),
            }
        );
    }
}
