//! SQLite schema of the music-streaming dataset.
//!
//! Integer surrogate keys, NOT NULL on required text fields, non-negative
//! checks on counts and durations, and foreign keys for every relationship.
//! Plays is keyed by (user_id, song_id, session_no).

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "Artists",
    foreign_column: "artist_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "Albums",
    foreign_column: "album_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "Users",
    foreign_column: "user_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "Songs",
    foreign_column: "song_id",
    on_delete: ForeignKeyOnChange::NoAction,
};

pub const ARTISTS_TABLE: Table = Table {
    name: "Artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("artist_name", &SqlType::Text, non_null = true),
        sqlite_column!("country", &SqlType::Text),
    ],
    primary_key: &[],
    indices: &[],
};

pub const ALBUMS_TABLE: Table = Table {
    name: "Albums",
    columns: &[
        sqlite_column!("album_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("album_name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!("release_year", &SqlType::Integer),
    ],
    primary_key: &[],
    indices: &[("idx_albums_artist", "artist_id")],
};

pub const SONGS_TABLE: Table = Table {
    name: "Songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_FK)
        ),
        sqlite_column!(
            "duration_seconds",
            &SqlType::Integer,
            check = Some("duration_seconds >= 0")
        ),
        sqlite_column!("popularity_index", &SqlType::Real),
    ],
    primary_key: &[],
    indices: &[("idx_songs_album", "album_id")],
};

/// Names and emails are intentionally not unique.
pub const USERS_TABLE: Table = Table {
    name: "Users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("user_name", &SqlType::Text, non_null = true),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("user_tier", &SqlType::Text),
        sqlite_column!("registration_year", &SqlType::Integer),
        sqlite_column!("favorite_genre", &SqlType::Text),
        sqlite_column!(
            "total_listens",
            &SqlType::Integer,
            default_value = Some("0"),
            check = Some("total_listens >= 0")
        ),
        sqlite_column!("email", &SqlType::Text),
    ],
    primary_key: &[],
    indices: &[],
};

pub const PLAYS_TABLE: Table = Table {
    name: "Plays",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("session_no", &SqlType::Integer, non_null = true),
        sqlite_column!("play_year", &SqlType::Integer),
        sqlite_column!("listen_score", &SqlType::Real),
        sqlite_column!("audio_quality", &SqlType::Text),
    ],
    primary_key: &["user_id", "song_id", "session_no"],
    indices: &[("idx_plays_song", "song_id")],
};

/// Tables in foreign-key order: every table only references tables listed
/// before it.
pub const DATASET_TABLES: &[&Table] = &[
    &ARTISTS_TABLE,
    &ALBUMS_TABLE,
    &SONGS_TABLE,
    &USERS_TABLE,
    &PLAYS_TABLE,
];

pub const DATASET_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        SONGS_TABLE,
        USERS_TABLE,
        PLAYS_TABLE,
    ],
}];
