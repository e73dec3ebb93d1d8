//! Pezzottify Dataset Library
//!
//! Synthesizes a reproducible music-streaming dataset (artists, albums, songs,
//! users and play events) and loads it into a constrained SQLite database.

pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod sqlite_persistence;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{AppConfig, GenerationSettings};
pub use dataset::{Dataset, RandomSource};
pub use pipeline::{
    generate_dataset, persist_dataset, run_pipeline, GeneratedDataset, GenerationReport,
    PipelineError, TableCounts,
};
pub use store::{DatasetStore, SqliteDatasetStore};
