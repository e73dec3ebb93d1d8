//! In-memory consistency checks for a generated dataset.
//!
//! Run before anything is persisted so that a dataset breaking the
//! referential rules never reaches the database.

use super::aggregate::listen_counts;
use super::models::{Play, SongId, UserId};
use super::Dataset;
use crate::config::RangeSettings;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NonDenseId {
        entity_type: &'static str,
        position: usize,
        id: u32,
    },
    ForeignKeyViolation {
        entity_type: &'static str,
        id: String,
        referenced: &'static str,
        referenced_id: u32,
    },
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
    SessionGap {
        user_id: UserId,
        song_id: SongId,
        sessions: Vec<u32>,
    },
    TotalListensMismatch {
        user_id: UserId,
        stored: u32,
        counted: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonDenseId {
                entity_type,
                position,
                id,
            } => write!(
                f,
                "{} at position {} has id {}, expected {}",
                entity_type,
                position,
                id,
                position + 1
            ),
            ValidationError::ForeignKeyViolation {
                entity_type,
                id,
                referenced,
                referenced_id,
            } => write!(
                f,
                "{} '{}' references missing {} {}",
                entity_type, id, referenced, referenced_id
            ),
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "Field '{}' is {}, outside [{}, {}]",
                field, value, min, max
            ),
            ValidationError::SessionGap {
                user_id,
                song_id,
                sessions,
            } => write!(
                f,
                "Sessions of user {} on song {} are not 1..{}: {:?}",
                user_id,
                song_id,
                sessions.len(),
                sessions
            ),
            ValidationError::TotalListensMismatch {
                user_id,
                stored,
                counted,
            } => write!(
                f,
                "User {} has total_listens {} but {} plays",
                user_id, stored, counted
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

fn check_dense<I>(entity_type: &'static str, ids: I, errors: &mut Vec<ValidationError>)
where
    I: IntoIterator<Item = u32>,
{
    for (position, id) in ids.into_iter().enumerate() {
        if id as usize != position + 1 {
            errors.push(ValidationError::NonDenseId {
                entity_type,
                position,
                id,
            });
        }
    }
}

fn check_int_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
    errors: &mut Vec<ValidationError>,
) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
}

fn check_real_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    errors: &mut Vec<ValidationError>,
) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
}

/// Validate that every (user, song) pair has session numbers exactly `1..=k`.
pub fn validate_sessions(plays: &[Play]) -> Vec<ValidationError> {
    let mut sessions: HashMap<(UserId, SongId), Vec<u32>> = HashMap::new();
    for play in plays {
        sessions.entry(play.pair()).or_default().push(play.session_no);
    }

    let mut errors = Vec::new();
    for ((user_id, song_id), mut numbers) in sessions {
        numbers.sort_unstable();
        let gap_free = numbers
            .iter()
            .enumerate()
            .all(|(index, session)| *session as usize == index + 1);
        if !gap_free {
            errors.push(ValidationError::SessionGap {
                user_id,
                song_id,
                sessions: numbers,
            });
        }
    }
    // HashMap iteration order is not stable
    errors.sort_by_key(|e| match e {
        ValidationError::SessionGap {
            user_id, song_id, ..
        } => (*user_id, *song_id),
        _ => (0, 0),
    });
    errors
}

/// Checks every structural rule of a dataset and returns all problems found.
/// An empty result means the dataset can be persisted.
pub fn verify_dataset(dataset: &Dataset, ranges: &RangeSettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_dense("Artist", dataset.artists.iter().map(|a| a.artist_id), &mut errors);
    check_dense("Album", dataset.albums.iter().map(|a| a.album_id), &mut errors);
    check_dense("Song", dataset.songs.iter().map(|s| s.song_id), &mut errors);
    check_dense("User", dataset.users.iter().map(|u| u.user_id), &mut errors);

    let artist_ids: HashSet<u32> = dataset.artists.iter().map(|a| a.artist_id).collect();
    let album_ids: HashSet<u32> = dataset.albums.iter().map(|a| a.album_id).collect();
    let song_ids: HashSet<u32> = dataset.songs.iter().map(|s| s.song_id).collect();
    let user_ids: HashSet<u32> = dataset.users.iter().map(|u| u.user_id).collect();

    for album in &dataset.albums {
        if !artist_ids.contains(&album.artist_id) {
            errors.push(ValidationError::ForeignKeyViolation {
                entity_type: "Album",
                id: album.album_id.to_string(),
                referenced: "Artist",
                referenced_id: album.artist_id,
            });
        }
        check_int_range(
            "release_year",
            album.release_year as i64,
            ranges.release_year.min,
            ranges.release_year.max,
            &mut errors,
        );
    }

    for song in &dataset.songs {
        if !album_ids.contains(&song.album_id) {
            errors.push(ValidationError::ForeignKeyViolation {
                entity_type: "Song",
                id: song.song_id.to_string(),
                referenced: "Album",
                referenced_id: song.album_id,
            });
        }
        check_int_range(
            "duration_seconds",
            song.duration_seconds as i64,
            ranges.duration_seconds.min,
            ranges.duration_seconds.max,
            &mut errors,
        );
        check_real_range(
            "popularity_index",
            song.popularity_index,
            ranges.popularity_index.min,
            ranges.popularity_index.max,
            &mut errors,
        );
    }

    for user in &dataset.users {
        check_int_range(
            "registration_year",
            user.registration_year as i64,
            ranges.registration_year.min,
            ranges.registration_year.max,
            &mut errors,
        );
    }

    for play in &dataset.plays {
        let id = format!("{}/{}/{}", play.user_id, play.song_id, play.session_no);
        if !user_ids.contains(&play.user_id) {
            errors.push(ValidationError::ForeignKeyViolation {
                entity_type: "Play",
                id: id.clone(),
                referenced: "User",
                referenced_id: play.user_id,
            });
        }
        if !song_ids.contains(&play.song_id) {
            errors.push(ValidationError::ForeignKeyViolation {
                entity_type: "Play",
                id,
                referenced: "Song",
                referenced_id: play.song_id,
            });
        }
        check_int_range(
            "play_year",
            play.play_year as i64,
            ranges.play_year.min,
            ranges.play_year.max,
            &mut errors,
        );
        check_real_range(
            "listen_score",
            play.listen_score,
            ranges.listen_score.min,
            ranges.listen_score.max,
            &mut errors,
        );
    }

    errors.extend(validate_sessions(&dataset.plays));

    let counts = listen_counts(&dataset.plays);
    for user in &dataset.users {
        let counted = counts.get(&user.user_id).copied().unwrap_or(0);
        if user.total_listens != counted {
            errors.push(ValidationError::TotalListensMismatch {
                user_id: user.user_id,
                stored: user.total_listens,
                counted,
            });
        }
    }

    errors
}
