mod file_config;
mod settings;

pub use file_config::{CountsConfig, FileConfig, QualityConfig, RangesConfig};
pub use settings::{
    check_population_floor, ConfigError, EntityCounts, GenerationSettings, IntRange,
    QualitySettings, RangeSettings, RealRange, DEFAULT_MIN_USERS, DEFAULT_SEED,
    DEFAULT_TIER_WEIGHTS, REAL_DECIMALS,
};

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_FILENAME: &str = "music_streaming.db";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub artists: Option<u32>,
    pub albums: Option<u32>,
    pub songs: Option<u32>,
    pub users: Option<u32>,
    pub plays: Option<u32>,
    pub min_users: Option<u32>,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
    pub generation: GenerationSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present, defaults fill the rest.
    ///
    /// Only the shape of the configuration is checked here; the generation
    /// settings are validated when a run starts.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let defaults = GenerationSettings::default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME));

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let report_path = file
            .report_path
            .map(PathBuf::from)
            .or_else(|| cli.report_path.clone());

        let file_counts = file.counts.unwrap_or_default();
        let counts = EntityCounts {
            artists: file_counts
                .artists
                .or(cli.artists)
                .unwrap_or(defaults.counts.artists),
            albums: file_counts
                .albums
                .or(cli.albums)
                .unwrap_or(defaults.counts.albums),
            songs: file_counts
                .songs
                .or(cli.songs)
                .unwrap_or(defaults.counts.songs),
            users: file_counts
                .users
                .or(cli.users)
                .unwrap_or(defaults.counts.users),
            plays: file_counts
                .plays
                .or(cli.plays)
                .unwrap_or(defaults.counts.plays),
        };

        let file_ranges = file.ranges.unwrap_or_default();
        let ranges = RangeSettings {
            release_year: file_ranges
                .release_year
                .unwrap_or(defaults.ranges.release_year),
            duration_seconds: file_ranges
                .duration_seconds
                .unwrap_or(defaults.ranges.duration_seconds),
            popularity_index: file_ranges
                .popularity_index
                .unwrap_or(defaults.ranges.popularity_index),
            registration_year: file_ranges
                .registration_year
                .unwrap_or(defaults.ranges.registration_year),
            play_year: file_ranges.play_year.unwrap_or(defaults.ranges.play_year),
            listen_score: file_ranges
                .listen_score
                .unwrap_or(defaults.ranges.listen_score),
        };

        let file_quality = file.quality.unwrap_or_default();
        let quality = QualitySettings {
            email_missing_probability: file_quality
                .email_missing_probability
                .unwrap_or(defaults.quality.email_missing_probability),
            duplicate_rate: file_quality
                .duplicate_rate
                .unwrap_or(defaults.quality.duplicate_rate),
            email_copy_probability: file_quality
                .email_copy_probability
                .unwrap_or(defaults.quality.email_copy_probability),
        };

        let tier_weights = match file.tier_weights {
            Some(weights) => match <[f64; 4]>::try_from(weights.as_slice()) {
                Ok(weights) => weights,
                Err(_) => bail!(
                    "tier_weights must list exactly 4 weights (Free, Basic, Premium, Family), got {}",
                    weights.len()
                ),
            },
            None => defaults.tier_weights,
        };

        let generation = GenerationSettings {
            seed: file.seed.or(cli.seed).unwrap_or(defaults.seed),
            counts,
            min_users: file
                .min_users
                .or(cli.min_users)
                .unwrap_or(defaults.min_users),
            ranges,
            quality,
            tier_weights,
        };

        Ok(Self {
            db_path,
            dry_run: cli.dry_run,
            report_path,
            generation,
        })
    }
}
