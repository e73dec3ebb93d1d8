mod records;
mod schema;
mod store;
mod trait_def;

pub use records::{rows_of, TableRecord};
pub use schema::{
    ALBUMS_TABLE, ARTISTS_TABLE, DATASET_TABLES, DATASET_VERSIONED_SCHEMAS, PLAYS_TABLE,
    SONGS_TABLE, USERS_TABLE,
};
pub use store::SqliteDatasetStore;
pub use trait_def::{DatasetStore, ForeignKeyViolation, ImportTransaction};
