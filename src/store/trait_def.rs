//! DatasetStore trait definition.
//!
//! Abstracts the persistence target of a generated dataset so the pipeline
//! can run against SQLite or a test double.

use crate::sqlite_persistence::Table;
use anyhow::Result;
use rusqlite::types::Value;
use serde::Serialize;
use std::fmt;

/// One row reported by `PRAGMA foreign_key_check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyViolation {
    pub table: String,
    pub rowid: Option<i64>,
    pub parent: String,
    pub fk_index: i64,
}

impl fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rowid {
            Some(rowid) => write!(
                f,
                "{} row {} references a missing {} row (constraint {})",
                self.table, rowid, self.parent, self.fk_index
            ),
            None => write!(
                f,
                "{} references a missing {} row (constraint {})",
                self.table, self.parent, self.fk_index
            ),
        }
    }
}

/// Trait for dataset storage backends.
pub trait DatasetStore: Send + Sync {
    /// Create all tables unless present, then check the live structure
    /// against the declared schema. Safe to call more than once.
    fn create_schema(&self) -> Result<()>;

    /// Append rows to `table`. Each row must list values in the table's
    /// declared column order. Returns the number of rows inserted.
    fn bulk_insert(&self, table: &'static Table, rows: &[Vec<Value>]) -> Result<usize>;

    /// Referential integrity check over the whole database.
    fn check_integrity(&self) -> Result<Vec<ForeignKeyViolation>>;

    // =========================================================================
    // Import transaction
    // =========================================================================

    fn begin_import(&self) -> Result<()>;
    fn commit_import(&self) -> Result<()>;
    fn rollback_import(&self) -> Result<()>;

    // =========================================================================
    // Read-back
    // =========================================================================

    fn count_rows(&self, table: &'static Table) -> Result<usize>;

    fn sum_total_listens(&self) -> Result<i64>;
}

/// Guard over an open import transaction. Rolls back on drop unless
/// `commit` was called.
pub struct ImportTransaction<'a> {
    store: &'a dyn DatasetStore,
    finished: bool,
}

impl<'a> ImportTransaction<'a> {
    pub fn begin(store: &'a dyn DatasetStore) -> Result<Self> {
        store.begin_import()?;
        Ok(Self {
            store,
            finished: false,
        })
    }

    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.store.commit_import()
    }

    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.store.rollback_import()
    }
}

impl Drop for ImportTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.store.rollback_import() {
                tracing::warn!("Failed to roll back import: {}", err);
            }
        }
    }
}
