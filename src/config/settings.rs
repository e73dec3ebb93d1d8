//! Generation parameters: seed, entity counts, value ranges and data-quality
//! rates, with their defaults and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected generation settings. Raised before any record is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Requested {entity} count must be positive")]
    NonPositiveCount { entity: &'static str },

    #[error("Requested {requested} users, at least {floor} are required")]
    BelowPopulationFloor { requested: u32, floor: u32 },

    #[error("Range '{name}' is invalid: min {min} > max {max}")]
    InvalidRange {
        name: &'static str,
        min: String,
        max: String,
    },

    #[error("Range '{name}' must lie within [{floor}, {ceiling}], got [{min}, {max}]")]
    RangeOutOfBounds {
        name: &'static str,
        min: i64,
        max: i64,
        floor: i64,
        ceiling: i64,
    },

    #[error("Range '{name}' bound {value} is not a multiple of {step}")]
    OffGridBound {
        name: &'static str,
        value: f64,
        step: f64,
    },

    #[error("Probability '{name}' must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Tier weights must be finite, non-negative and not all zero: {0:?}")]
    InvalidWeights(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Checks ordering and that both bounds fit the column the draws land in.
    fn validate(&self, name: &'static str, floor: i64, ceiling: i64) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        if self.min < floor || self.max > ceiling {
            return Err(ConfigError::RangeOutOfBounds {
                name,
                min: self.min,
                max: self.max,
                floor,
                ceiling,
            });
        }
        Ok(())
    }
}

/// Bounds of year fields, stored as `i32`.
const YEAR_BOUNDS: (i64, i64) = (i32::MIN as i64, i32::MAX as i64);
/// Bounds of durations, stored as `u32`.
const DURATION_BOUNDS: (i64, i64) = (0, u32::MAX as i64);

/// Real draws are rounded to this many decimals.
pub const REAL_DECIMALS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealRange {
    pub min: f64,
    pub max: f64,
}

impl RealRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Bounds must sit on the rounding grid, otherwise a rounded draw could
    /// land outside the range.
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        // also rejects NaN bounds
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        let factor = 10f64.powi(REAL_DECIMALS);
        for value in [self.min, self.max] {
            let scaled = value * factor;
            if (scaled - scaled.round()).abs() > 1e-6 {
                return Err(ConfigError::OffGridBound {
                    name,
                    value,
                    step: 1.0 / factor,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub artists: u32,
    pub albums: u32,
    pub songs: u32,
    pub users: u32,
    pub plays: u32,
}

impl Default for EntityCounts {
    fn default() -> Self {
        Self {
            artists: 120,
            albums: 400,
            songs: 1200,
            users: 1100,
            plays: 3500,
        }
    }
}

/// Bounds of every uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSettings {
    pub release_year: IntRange,
    pub duration_seconds: IntRange,
    pub popularity_index: RealRange,
    pub registration_year: IntRange,
    pub play_year: IntRange,
    pub listen_score: RealRange,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            release_year: IntRange::new(1980, 2024),
            duration_seconds: IntRange::new(120, 420),
            popularity_index: RealRange::new(0.0, 100.0),
            registration_year: IntRange::new(2010, 2024),
            play_year: IntRange::new(2018, 2024),
            listen_score: RealRange::new(0.0, 10.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Chance that a user is left without an email.
    pub email_missing_probability: f64,
    /// Duplication passes as a fraction of the user population.
    pub duplicate_rate: f64,
    /// Chance that a duplication pass also copies the email.
    pub email_copy_probability: f64,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            email_missing_probability: 0.05,
            duplicate_rate: 0.02,
            email_copy_probability: 0.5,
        }
    }
}

pub const DEFAULT_SEED: u64 = 123;
pub const DEFAULT_MIN_USERS: u32 = 1000;
/// Free, Basic, Premium, Family.
pub const DEFAULT_TIER_WEIGHTS: [f64; 4] = [0.5, 0.3, 0.15, 0.05];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub seed: u64,
    pub counts: EntityCounts,
    pub min_users: u32,
    pub ranges: RangeSettings,
    pub quality: QualitySettings,
    pub tier_weights: [f64; 4],
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            counts: EntityCounts::default(),
            min_users: DEFAULT_MIN_USERS,
            ranges: RangeSettings::default(),
            quality: QualitySettings::default(),
            tier_weights: DEFAULT_TIER_WEIGHTS,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("artists", self.counts.artists),
            ("albums", self.counts.albums),
            ("songs", self.counts.songs),
            ("users", self.counts.users),
            ("plays", self.counts.plays),
        ];
        for (entity, count) in counts {
            if count == 0 {
                return Err(ConfigError::NonPositiveCount { entity });
            }
        }
        check_population_floor(self.counts.users, self.min_users)?;

        let ranges = &self.ranges;
        let (year_floor, year_ceiling) = YEAR_BOUNDS;
        let (duration_floor, duration_ceiling) = DURATION_BOUNDS;
        ranges
            .release_year
            .validate("release_year", year_floor, year_ceiling)?;
        ranges
            .duration_seconds
            .validate("duration_seconds", duration_floor, duration_ceiling)?;
        ranges.popularity_index.validate("popularity_index")?;
        ranges
            .registration_year
            .validate("registration_year", year_floor, year_ceiling)?;
        ranges
            .play_year
            .validate("play_year", year_floor, year_ceiling)?;
        ranges.listen_score.validate("listen_score")?;

        let probabilities = [
            (
                "email_missing_probability",
                self.quality.email_missing_probability,
            ),
            ("duplicate_rate", self.quality.duplicate_rate),
            ("email_copy_probability", self.quality.email_copy_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        let weights_valid = self.tier_weights.iter().all(|w| w.is_finite() && *w >= 0.0)
            && self.tier_weights.iter().sum::<f64>() > 0.0;
        if !weights_valid {
            return Err(ConfigError::InvalidWeights(self.tier_weights.to_vec()));
        }
        Ok(())
    }
}

pub fn check_population_floor(requested: u32, floor: u32) -> Result<(), ConfigError> {
    if requested < floor {
        return Err(ConfigError::BelowPopulationFloor { requested, floor });
    }
    Ok(())
}
