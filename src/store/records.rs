//! Row mapping from dataset entities to table rows.

use super::schema::{ALBUMS_TABLE, ARTISTS_TABLE, PLAYS_TABLE, SONGS_TABLE, USERS_TABLE};
use crate::dataset::{Album, Artist, Play, Song, User};
use crate::sqlite_persistence::Table;
use rusqlite::types::Value;

/// An entity that is persisted as one row of a schema table. `to_row`
/// yields values in the table's declared column order.
pub trait TableRecord {
    fn table() -> &'static Table;
    fn to_row(&self) -> Vec<Value>;
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map(text).unwrap_or(Value::Null)
}

impl TableRecord for Artist {
    fn table() -> &'static Table {
        &ARTISTS_TABLE
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.artist_id as i64),
            text(&self.name),
            text(&self.country),
        ]
    }
}

impl TableRecord for Album {
    fn table() -> &'static Table {
        &ALBUMS_TABLE
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.album_id as i64),
            text(&self.name),
            Value::Integer(self.artist_id as i64),
            text(self.genre.to_db_str()),
            Value::Integer(self.release_year as i64),
        ]
    }
}

impl TableRecord for Song {
    fn table() -> &'static Table {
        &SONGS_TABLE
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.song_id as i64),
            text(&self.title),
            Value::Integer(self.album_id as i64),
            Value::Integer(self.duration_seconds as i64),
            Value::Real(self.popularity_index),
        ]
    }
}

impl TableRecord for User {
    fn table() -> &'static Table {
        &USERS_TABLE
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.user_id as i64),
            text(&self.name),
            text(self.gender.to_db_str()),
            text(self.tier.to_db_str()),
            Value::Integer(self.registration_year as i64),
            text(self.favorite_genre.to_db_str()),
            Value::Integer(self.total_listens as i64),
            optional_text(self.email.as_deref()),
        ]
    }
}

impl TableRecord for Play {
    fn table() -> &'static Table {
        &PLAYS_TABLE
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.user_id as i64),
            Value::Integer(self.song_id as i64),
            Value::Integer(self.session_no as i64),
            Value::Integer(self.play_year as i64),
            Value::Real(self.listen_score),
            text(self.audio_quality.to_db_str()),
        ]
    }
}

/// Maps a slice of records to rows for `DatasetStore::bulk_insert`.
pub fn rows_of<R: TableRecord>(records: &[R]) -> Vec<Vec<Value>> {
    records.iter().map(TableRecord::to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AudioQuality, Gender, Genre, UserTier};

    #[test]
    fn test_row_arity_matches_table() {
        let artist = Artist {
            artist_id: 1,
            name: "Nina Simone".to_string(),
            country: "United States".to_string(),
        };
        let album = Album {
            album_id: 1,
            name: "Echo Collection 12".to_string(),
            artist_id: 1,
            genre: Genre::RnB,
            release_year: 2001,
        };
        let song = Song {
            song_id: 1,
            title: "Echo Dream".to_string(),
            album_id: 1,
            duration_seconds: 250,
            popularity_index: 12.34,
        };
        let play = Play {
            user_id: 1,
            song_id: 1,
            session_no: 1,
            play_year: 2022,
            listen_score: 9.5,
            audio_quality: AudioQuality::Low,
        };

        assert_eq!(artist.to_row().len(), Artist::table().columns.len());
        assert_eq!(album.to_row().len(), Album::table().columns.len());
        assert_eq!(song.to_row().len(), Song::table().columns.len());
        assert_eq!(play.to_row().len(), Play::table().columns.len());
        assert_eq!(album.to_row()[3], Value::Text("R&B".to_string()));
    }

    #[test]
    fn test_absent_email_maps_to_null() {
        let user = User {
            user_id: 3,
            name: "Alan Turing".to_string(),
            gender: Gender::NonBinary,
            tier: UserTier::Family,
            registration_year: 2011,
            favorite_genre: Genre::HipHop,
            total_listens: 4,
            email: None,
        };
        let row = user.to_row();
        assert_eq!(row.len(), User::table().columns.len());
        assert_eq!(row[2], Value::Text("Non-binary".to_string()));
        assert_eq!(row[5], Value::Text("Hip-Hop".to_string()));
        assert_eq!(row[7], Value::Null);
    }
}
