use super::settings::{IntRange, RealRange};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub seed: Option<u64>,
    pub min_users: Option<u32>,
    pub tier_weights: Option<Vec<f64>>,
    pub report_path: Option<String>,

    // Sections
    pub counts: Option<CountsConfig>,
    pub ranges: Option<RangesConfig>,
    pub quality: Option<QualityConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CountsConfig {
    pub artists: Option<u32>,
    pub albums: Option<u32>,
    pub songs: Option<u32>,
    pub users: Option<u32>,
    pub plays: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RangesConfig {
    pub release_year: Option<IntRange>,
    pub duration_seconds: Option<IntRange>,
    pub popularity_index: Option<RealRange>,
    pub registration_year: Option<IntRange>,
    pub play_year: Option<IntRange>,
    pub listen_score: Option<RealRange>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct QualityConfig {
    pub email_missing_probability: Option<f64>,
    pub duplicate_rate: Option<f64>,
    pub email_copy_probability: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
