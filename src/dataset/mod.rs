//! In-memory dataset synthesis.
//!
//! Stages run in a fixed order against one random source: artists, albums,
//! songs, users, plays, data-quality injection, and finally the listen-count
//! aggregation. Reordering the draws changes the output for a given seed.

mod aggregate;
mod error;
mod generators;
mod models;
mod names;
mod plays;
mod quality;
mod random_source;
mod validation;

pub use aggregate::{apply_total_listens, listen_counts};
pub use error::GenerationError;
pub use generators::{generate_albums, generate_artists, generate_songs, generate_users};
pub use models::*;
pub use plays::{generate_plays, SessionCounter};
pub use quality::{apply_data_quality, QualityReport};
pub use random_source::RandomSource;
pub use validation::{verify_dataset, ValidationError};

use crate::config::GenerationSettings;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
    pub users: Vec<User>,
    pub plays: Vec<Play>,
}

impl Dataset {
    /// Runs every generation stage. Settings are expected to be validated;
    /// the population floor is enforced again by the user generator.
    pub fn generate(
        settings: &GenerationSettings,
        rng: &mut RandomSource,
    ) -> Result<(Dataset, QualityReport), GenerationError> {
        let counts = &settings.counts;
        let ranges = &settings.ranges;

        let artists = generate_artists(counts.artists, rng);
        let albums = generate_albums(counts.albums, &artists, ranges, rng)?;
        let songs = generate_songs(counts.songs, &albums, ranges, rng)?;
        let mut users = generate_users(
            counts.users,
            settings.min_users,
            ranges,
            &settings.tier_weights,
            rng,
        )?;
        let plays = generate_plays(counts.plays, &users, &songs, ranges, rng)?;
        let quality = apply_data_quality(&mut users, &settings.quality, rng);
        apply_total_listens(&mut users, &plays);

        Ok((
            Dataset {
                artists,
                albums,
                songs,
                users,
                plays,
            },
            quality,
        ))
    }

    pub fn total_listens(&self) -> u64 {
        self.users.iter().map(|u| u.total_listens as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityCounts;

    fn small_settings(seed: u64) -> GenerationSettings {
        GenerationSettings {
            seed,
            counts: EntityCounts {
                artists: 8,
                albums: 20,
                songs: 60,
                users: 100,
                plays: 400,
            },
            min_users: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_produces_requested_counts() {
        let settings = small_settings(1);
        let mut rng = RandomSource::new(settings.seed);
        let (dataset, _) = Dataset::generate(&settings, &mut rng).unwrap();

        assert_eq!(dataset.artists.len(), 8);
        assert_eq!(dataset.albums.len(), 20);
        assert_eq!(dataset.songs.len(), 60);
        assert_eq!(dataset.users.len(), 100);
        assert_eq!(dataset.plays.len(), 400);
        assert_eq!(dataset.total_listens(), 400);
    }

    #[test]
    fn test_generated_dataset_verifies() {
        let settings = small_settings(2);
        let mut rng = RandomSource::new(settings.seed);
        let (dataset, _) = Dataset::generate(&settings, &mut rng).unwrap();
        assert_eq!(verify_dataset(&dataset, &settings.ranges), vec![]);
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let settings = small_settings(3);
        let (first, first_quality) =
            Dataset::generate(&settings, &mut RandomSource::new(settings.seed)).unwrap();
        let (second, second_quality) =
            Dataset::generate(&settings, &mut RandomSource::new(settings.seed)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_quality, second_quality);
    }

    #[test]
    fn test_different_seed_different_dataset() {
        let settings = small_settings(4);
        let (first, _) = Dataset::generate(&settings, &mut RandomSource::new(4)).unwrap();
        let (second, _) = Dataset::generate(&settings, &mut RandomSource::new(5)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_generate_below_floor_fails() {
        let mut settings = small_settings(6);
        settings.min_users = 1000;
        let result = Dataset::generate(&settings, &mut RandomSource::new(6));
        assert!(matches!(result, Err(GenerationError::Config(_))));
    }
}
