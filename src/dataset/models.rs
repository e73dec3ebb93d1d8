//! Entity models for the generated music-streaming dataset.
//!
//! Identifiers are dense, 1-based surrogate keys assigned at creation time.

use serde::{Deserialize, Serialize};

pub type ArtistId = u32;
pub type AlbumId = u32;
pub type SongId = u32;
pub type UserId = u32;

// =============================================================================
// Enumerations
// =============================================================================

/// Album and user genre, a closed nominal set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Pop,
    Rock,
    HipHop,
    Electronic,
    Jazz,
    Classical,
    Country,
    RnB,
    Reggae,
    Metal,
    Folk,
    Indie,
}

impl Genre {
    pub const ALL: [Genre; 12] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Classical,
        Genre::Country,
        Genre::RnB,
        Genre::Reggae,
        Genre::Metal,
        Genre::Folk,
        Genre::Indie,
    ];

    /// Convert to database string representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::HipHop => "Hip-Hop",
            Genre::Electronic => "Electronic",
            Genre::Jazz => "Jazz",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::RnB => "R&B",
            Genre::Reggae => "Reggae",
            Genre::Metal => "Metal",
            Genre::Folk => "Folk",
            Genre::Indie => "Indie",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::NonBinary,
        Gender::PreferNotToSay,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Subscription tier. Variant order is the rank: Free < Basic < Premium < Family.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserTier {
    Free,
    Basic,
    Premium,
    Family,
}

impl UserTier {
    /// Ordered from the lowest to the highest rank.
    pub const ALL: [UserTier; 4] = [
        UserTier::Free,
        UserTier::Basic,
        UserTier::Premium,
        UserTier::Family,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            UserTier::Free => "Free",
            UserTier::Basic => "Basic",
            UserTier::Premium => "Premium",
            UserTier::Family => "Family",
        }
    }
}

/// Streaming quality of a single play. Low < Medium < High.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AudioQuality {
    Low,
    Medium,
    High,
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 3] = [AudioQuality::Low, AudioQuality::Medium, AudioQuality::High];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            AudioQuality::Low => "Low",
            AudioQuality::Medium => "Medium",
            AudioQuality::High => "High",
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: ArtistId,
    pub name: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub album_id: AlbumId,
    pub name: String,
    pub artist_id: ArtistId,
    pub genre: Genre,
    pub release_year: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub song_id: SongId,
    pub title: String,
    pub album_id: AlbumId,
    pub duration_seconds: u32,
    /// Interval scale, 0-100 with two decimals.
    pub popularity_index: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub gender: Gender,
    pub tier: UserTier,
    pub registration_year: i32,
    pub favorite_genre: Genre,
    /// Derived from the play table, see `aggregate::apply_total_listens`.
    pub total_listens: u32,
    pub email: Option<String>,
}

/// One listening event. (user_id, song_id, session_no) is unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub user_id: UserId,
    pub song_id: SongId,
    pub session_no: u32,
    pub play_year: i32,
    /// Interval scale, 0-10 with two decimals.
    pub listen_score: f64,
    pub audio_quality: AudioQuality,
}

impl Play {
    pub fn pair(&self) -> (UserId, SongId) {
        (self.user_id, self.song_id)
    }
}
