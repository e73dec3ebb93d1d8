//! Play event (fact table) generation.

use super::error::GenerationError;
use super::models::{AudioQuality, Play, Song, SongId, User, UserId};
use super::random_source::RandomSource;
use crate::config::{RangeSettings, REAL_DECIMALS};
use std::collections::HashMap;
use tracing::debug;

/// Running session number per (user, song) pair.
#[derive(Debug, Default)]
pub struct SessionCounter {
    sessions: HashMap<(UserId, SongId), u32>,
}

impl SessionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next 1-based session number for the pair and records it.
    pub fn next(&mut self, user_id: UserId, song_id: SongId) -> u32 {
        let session = self.sessions.entry((user_id, song_id)).or_insert(0);
        *session += 1;
        *session
    }

    pub fn distinct_pairs(&self) -> usize {
        self.sessions.len()
    }
}

/// Generates `count` plays between existing users and songs, sampled
/// independently and with replacement.
pub fn generate_plays(
    count: u32,
    users: &[User],
    songs: &[Song],
    ranges: &RangeSettings,
    rng: &mut RandomSource,
) -> Result<Vec<Play>, GenerationError> {
    let missing_parents = |parent| GenerationError::MissingParents {
        entity: "plays",
        parent,
    };
    if users.is_empty() {
        return Err(missing_parents("users"));
    }
    if songs.is_empty() {
        return Err(missing_parents("songs"));
    }

    let mut counter = SessionCounter::new();
    let mut plays = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let user_id = rng.choose(users).ok_or_else(|| missing_parents("users"))?.user_id;
        let song_id = rng.choose(songs).ok_or_else(|| missing_parents("songs"))?.song_id;
        let session_no = counter.next(user_id, song_id);
        let play_year = rng.int_between(ranges.play_year.min, ranges.play_year.max) as i32;
        let listen_score = rng.rounded_real_between(
            ranges.listen_score.min,
            ranges.listen_score.max,
            REAL_DECIMALS,
        );
        let audio_quality = AudioQuality::ALL[rng.index(AudioQuality::ALL.len())];
        plays.push(Play {
            user_id,
            song_id,
            session_no,
            play_year,
            listen_score,
            audio_quality,
        });
    }
    debug!(
        "Generated {} plays over {} distinct user/song pairs",
        plays.len(),
        counter.distinct_pairs()
    );
    Ok(plays)
}
