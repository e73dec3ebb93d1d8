//! Per-user listen totals derived from the play table.

use super::models::{Play, User, UserId};
use std::collections::HashMap;

/// Number of plays per user. Users without plays are absent from the map.
pub fn listen_counts(plays: &[Play]) -> HashMap<UserId, u32> {
    let mut counts = HashMap::new();
    for play in plays {
        *counts.entry(play.user_id).or_insert(0) += 1;
    }
    counts
}

/// Overwrites every user's `total_listens` with its play count, 0 when the
/// user never appears in `plays`.
pub fn apply_total_listens(users: &mut [User], plays: &[Play]) {
    let counts = listen_counts(plays);
    for user in users.iter_mut() {
        user.total_listens = counts.get(&user.user_id).copied().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::models::{AudioQuality, Gender, Genre, UserTier};

    fn user(user_id: u32, total_listens: u32) -> User {
        User {
            user_id,
            name: "Ada Lovelace".to_string(),
            gender: Gender::PreferNotToSay,
            tier: UserTier::Premium,
            registration_year: 2012,
            favorite_genre: Genre::Classical,
            total_listens,
            email: None,
        }
    }

    fn play(user_id: u32, song_id: u32, session_no: u32) -> Play {
        Play {
            user_id,
            song_id,
            session_no,
            play_year: 2020,
            listen_score: 5.0,
            audio_quality: AudioQuality::Medium,
        }
    }

    #[test]
    fn test_counts_by_user() {
        let plays = vec![play(1, 1, 1), play(1, 1, 2), play(2, 3, 1), play(1, 4, 1)];
        let counts = listen_counts(&plays);
        assert_eq!(counts.get(&1), Some(&3));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), None);
    }

    #[test]
    fn test_users_without_plays_get_zero() {
        // stale values must be overwritten
        let mut users = vec![user(1, 42), user(2, 7), user(3, 0)];
        let plays = vec![play(2, 1, 1), play(2, 2, 1)];

        apply_total_listens(&mut users, &plays);

        let totals: Vec<u32> = users.iter().map(|u| u.total_listens).collect();
        assert_eq!(totals, vec![0, 2, 0]);
    }

    #[test]
    fn test_sum_matches_play_count_regardless_of_order() {
        let mut plays = vec![
            play(1, 1, 1),
            play(2, 1, 1),
            play(3, 2, 1),
            play(1, 1, 2),
            play(3, 5, 1),
        ];
        let mut forward = vec![user(1, 0), user(2, 0), user(3, 0), user(4, 0)];
        apply_total_listens(&mut forward, &plays);

        plays.reverse();
        let mut backward = forward.clone();
        apply_total_listens(&mut backward, &plays);

        assert_eq!(forward, backward);
        let sum: u32 = forward.iter().map(|u| u.total_listens).sum();
        assert_eq!(sum as usize, plays.len());
    }
}
