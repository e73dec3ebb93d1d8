//! End-to-end run: generate, verify, persist, read back.

use crate::config::GenerationSettings;
use crate::dataset::{
    Album, Artist, Dataset, GenerationError, Play, QualityReport, RandomSource, Song, User,
};
use crate::store::{
    rows_of, DatasetStore, ForeignKeyViolation, ImportTransaction, TableRecord, ALBUMS_TABLE,
    ARTISTS_TABLE, PLAYS_TABLE, SONGS_TABLE, USERS_TABLE,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Referential integrity check found {} violations", .0.len())]
    IntegrityViolations(Vec<ForeignKeyViolation>),

    #[error("Persistence failed: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

/// A generated dataset together with what the data-quality pass did to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDataset {
    pub dataset: Dataset,
    pub quality: QualityReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub artists: usize,
    pub albums: usize,
    pub songs: usize,
    pub users: usize,
    pub plays: usize,
}

impl TableCounts {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            artists: dataset.artists.len(),
            albums: dataset.albums.len(),
            songs: dataset.songs.len(),
            users: dataset.users.len(),
            plays: dataset.plays.len(),
        }
    }

    pub fn read_back(store: &dyn DatasetStore) -> anyhow::Result<Self> {
        Ok(Self {
            artists: store.count_rows(&ARTISTS_TABLE)?,
            albums: store.count_rows(&ALBUMS_TABLE)?,
            songs: store.count_rows(&SONGS_TABLE)?,
            users: store.count_rows(&USERS_TABLE)?,
            plays: store.count_rows(&PLAYS_TABLE)?,
        })
    }

    /// (table name, row count) in foreign-key order.
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            (ARTISTS_TABLE.name, self.artists),
            (ALBUMS_TABLE.name, self.albums),
            (SONGS_TABLE.name, self.songs),
            (USERS_TABLE.name, self.users),
            (PLAYS_TABLE.name, self.plays),
        ]
    }
}

/// Summary of a run, written out as JSON with `--report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub persisted: bool,
    pub table_counts: TableCounts,
    pub total_listens: i64,
    pub quality: QualityReport,
    pub violations: Vec<ForeignKeyViolation>,
}

impl GenerationReport {
    /// Report for a dataset that was generated but not persisted.
    pub fn in_memory(seed: u64, generated: &GeneratedDataset) -> Self {
        Self {
            seed,
            persisted: false,
            table_counts: TableCounts::of(&generated.dataset),
            total_listens: generated.dataset.total_listens() as i64,
            quality: generated.quality.clone(),
            violations: Vec::new(),
        }
    }
}

/// Validates the settings, then runs every generation stage from a fresh
/// random source seeded with `settings.seed`.
pub fn generate_dataset(settings: &GenerationSettings) -> Result<GeneratedDataset, PipelineError> {
    settings.validate().map_err(GenerationError::from)?;

    info!("Generating dataset with seed {}", settings.seed);
    let mut rng = RandomSource::new(settings.seed);
    let (dataset, quality) = Dataset::generate(settings, &mut rng)?;
    info!(
        "Generated {} artists, {} albums, {} songs, {} users, {} plays",
        dataset.artists.len(),
        dataset.albums.len(),
        dataset.songs.len(),
        dataset.users.len(),
        dataset.plays.len()
    );

    #[cfg(not(feature = "no_checks"))]
    {
        let problems = crate::dataset::verify_dataset(&dataset, &settings.ranges);
        if !problems.is_empty() {
            return Err(GenerationError::Inconsistent(problems).into());
        }
    }

    Ok(GeneratedDataset { dataset, quality })
}

fn insert_all<R: TableRecord>(store: &dyn DatasetStore, records: &[R]) -> anyhow::Result<()> {
    let inserted = store.bulk_insert(R::table(), &rows_of(records))?;
    info!("Loaded {} rows into {}", inserted, R::table().name);
    Ok(())
}

/// Creates the schema and loads the dataset in foreign-key order inside one
/// import transaction. Nothing is kept if any insert or the integrity check
/// fails. Returns the row counts read back after commit.
pub fn persist_dataset(
    store: &dyn DatasetStore,
    dataset: &Dataset,
) -> Result<TableCounts, PipelineError> {
    store.create_schema()?;

    let tx = ImportTransaction::begin(store)?;
    insert_all::<Artist>(store, &dataset.artists)?;
    insert_all::<Album>(store, &dataset.albums)?;
    insert_all::<Song>(store, &dataset.songs)?;
    insert_all::<User>(store, &dataset.users)?;
    insert_all::<Play>(store, &dataset.plays)?;

    let violations = store.check_integrity()?;
    if !violations.is_empty() {
        for violation in &violations {
            warn!("{}", violation);
        }
        tx.rollback()?;
        return Err(PipelineError::IntegrityViolations(violations));
    }
    tx.commit()?;

    Ok(TableCounts::read_back(store)?)
}

/// Generates and persists a dataset, then builds the run report from what
/// the store holds.
pub fn run_pipeline(
    settings: &GenerationSettings,
    store: &dyn DatasetStore,
) -> Result<GenerationReport, PipelineError> {
    let generated = generate_dataset(settings)?;
    let table_counts = persist_dataset(store, &generated.dataset)?;

    let total_listens = store.sum_total_listens()?;
    let violations = store.check_integrity()?;
    info!(
        "Dataset persisted: {} plays, total_listens sum {}, {} integrity violations",
        table_counts.plays,
        total_listens,
        violations.len()
    );

    Ok(GenerationReport {
        seed: settings.seed,
        persisted: true,
        table_counts,
        total_listens,
        quality: generated.quality,
        violations,
    })
}
