//! Entity generators for artists, albums, songs and users.
//!
//! Each generator emits exactly `count` records with ids `1..=count` and only
//! references ids of the parent sets it is handed.

use super::error::GenerationError;
use super::models::*;
use super::names;
use super::random_source::RandomSource;
use crate::config::{check_population_floor, RangeSettings, REAL_DECIMALS};
use tracing::debug;

pub fn generate_artists(count: u32, rng: &mut RandomSource) -> Vec<Artist> {
    let artists: Vec<Artist> = (1..=count)
        .map(|artist_id| Artist {
            artist_id,
            name: names::person_name(rng),
            country: names::country(rng),
        })
        .collect();
    debug!("Generated {} artists", artists.len());
    artists
}

pub fn generate_albums(
    count: u32,
    artists: &[Artist],
    ranges: &RangeSettings,
    rng: &mut RandomSource,
) -> Result<Vec<Album>, GenerationError> {
    let missing_parents = || GenerationError::MissingParents {
        entity: "albums",
        parent: "artists",
    };
    if artists.is_empty() {
        return Err(missing_parents());
    }

    let mut albums = Vec::with_capacity(count as usize);
    for album_id in 1..=count {
        let artist_id = rng.choose(artists).ok_or_else(missing_parents)?.artist_id;
        let name = names::album_name(rng);
        let genre = Genre::ALL[rng.index(Genre::ALL.len())];
        let release_year =
            rng.int_between(ranges.release_year.min, ranges.release_year.max) as i32;
        albums.push(Album {
            album_id,
            name,
            artist_id,
            genre,
            release_year,
        });
    }
    debug!("Generated {} albums", albums.len());
    Ok(albums)
}

pub fn generate_songs(
    count: u32,
    albums: &[Album],
    ranges: &RangeSettings,
    rng: &mut RandomSource,
) -> Result<Vec<Song>, GenerationError> {
    let missing_parents = || GenerationError::MissingParents {
        entity: "songs",
        parent: "albums",
    };
    if albums.is_empty() {
        return Err(missing_parents());
    }

    let mut songs = Vec::with_capacity(count as usize);
    for song_id in 1..=count {
        let album_id = match rng.sample_without_replacement(albums, 1).first() {
            Some(album) => album.album_id,
            None => return Err(missing_parents()),
        };
        let title = names::song_title(rng);
        let duration_seconds = rng.int_between(
            ranges.duration_seconds.min.max(0),
            ranges.duration_seconds.max.max(0),
        ) as u32;
        let popularity_index = rng.rounded_real_between(
            ranges.popularity_index.min,
            ranges.popularity_index.max,
            REAL_DECIMALS,
        );
        songs.push(Song {
            song_id,
            title,
            album_id,
            duration_seconds,
            popularity_index,
        });
    }
    debug!("Generated {} songs", songs.len());
    Ok(songs)
}

/// Users start without email and with `total_listens == 0`; both are filled
/// in by later stages.
pub fn generate_users(
    count: u32,
    min_users: u32,
    ranges: &RangeSettings,
    tier_weights: &[f64; 4],
    rng: &mut RandomSource,
) -> Result<Vec<User>, GenerationError> {
    check_population_floor(count, min_users)?;

    let mut users = Vec::with_capacity(count as usize);
    for user_id in 1..=count {
        let name = names::person_name(rng);
        let gender = Gender::ALL[rng.index(Gender::ALL.len())];
        let tier = match rng.weighted_index(tier_weights) {
            Some(index) => UserTier::ALL[index],
            None => {
                return Err(GenerationError::Config(
                    crate::config::ConfigError::InvalidWeights(tier_weights.to_vec()),
                ))
            }
        };
        let registration_year =
            rng.int_between(ranges.registration_year.min, ranges.registration_year.max) as i32;
        let favorite_genre = Genre::ALL[rng.index(Genre::ALL.len())];
        users.push(User {
            user_id,
            name,
            gender,
            tier,
            registration_year,
            favorite_genre,
            total_listens: 0,
            email: None,
        });
    }
    debug!("Generated {} users", users.len());
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, DEFAULT_TIER_WEIGHTS};
    use std::collections::HashSet;

    fn ranges() -> RangeSettings {
        RangeSettings::default()
    }

    #[test]
    fn test_artist_ids_dense_from_one() {
        let mut rng = RandomSource::new(1);
        let artists = generate_artists(25, &mut rng);
        let ids: Vec<u32> = artists.iter().map(|a| a.artist_id).collect();
        assert_eq!(ids, (1..=25).collect::<Vec<_>>());
        assert!(artists.iter().all(|a| !a.name.is_empty() && !a.country.is_empty()));
    }

    #[test]
    fn test_albums_reference_existing_artists() {
        let mut rng = RandomSource::new(2);
        let artists = generate_artists(10, &mut rng);
        let albums = generate_albums(200, &artists, &ranges(), &mut rng).unwrap();

        let artist_ids: HashSet<u32> = artists.iter().map(|a| a.artist_id).collect();
        assert_eq!(albums.len(), 200);
        for (index, album) in albums.iter().enumerate() {
            assert_eq!(album.album_id, index as u32 + 1);
            assert!(artist_ids.contains(&album.artist_id));
            assert!((1980..=2024).contains(&album.release_year));
        }
    }

    #[test]
    fn test_albums_without_artists_fail() {
        let mut rng = RandomSource::new(2);
        let result = generate_albums(5, &[], &ranges(), &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::MissingParents {
                entity: "albums",
                parent: "artists"
            })
        ));
    }

    #[test]
    fn test_songs_reference_existing_albums_and_respect_ranges() {
        let mut rng = RandomSource::new(3);
        let artists = generate_artists(5, &mut rng);
        let albums = generate_albums(20, &artists, &ranges(), &mut rng).unwrap();
        let songs = generate_songs(300, &albums, &ranges(), &mut rng).unwrap();

        let album_ids: HashSet<u32> = albums.iter().map(|a| a.album_id).collect();
        for song in &songs {
            assert!(album_ids.contains(&song.album_id));
            assert!((120..=420).contains(&song.duration_seconds));
            assert!((0.0..=100.0).contains(&song.popularity_index));
        }
        // every album should be hit at least once with 300 draws over 20 albums
        let used: HashSet<u32> = songs.iter().map(|s| s.album_id).collect();
        assert_eq!(used.len(), album_ids.len());
    }

    #[test]
    fn test_songs_without_albums_fail() {
        let mut rng = RandomSource::new(3);
        assert!(generate_songs(1, &[], &ranges(), &mut rng).is_err());
    }

    #[test]
    fn test_users_start_with_placeholders() {
        let mut rng = RandomSource::new(4);
        let users =
            generate_users(1000, 1000, &ranges(), &DEFAULT_TIER_WEIGHTS, &mut rng).unwrap();
        assert_eq!(users.len(), 1000);
        for user in &users {
            assert_eq!(user.total_listens, 0);
            assert!(user.email.is_none());
            assert!((2010..=2024).contains(&user.registration_year));
        }
    }

    #[test]
    fn test_user_tiers_biased_toward_free() {
        let mut rng = RandomSource::new(5);
        let users =
            generate_users(2000, 1000, &ranges(), &DEFAULT_TIER_WEIGHTS, &mut rng).unwrap();
        let count = |tier: UserTier| users.iter().filter(|u| u.tier == tier).count();
        assert!(count(UserTier::Free) > count(UserTier::Basic));
        assert!(count(UserTier::Basic) > count(UserTier::Premium));
        assert!(count(UserTier::Premium) > count(UserTier::Family));
    }

    #[test]
    fn test_users_below_floor_fail() {
        let mut rng = RandomSource::new(6);
        let result = generate_users(500, 1000, &ranges(), &DEFAULT_TIER_WEIGHTS, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::Config(ConfigError::BelowPopulationFloor {
                requested: 500,
                floor: 1000
            }))
        ));
    }
}
