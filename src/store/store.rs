//! SQLite-backed dataset store.

use super::schema::DATASET_VERSIONED_SCHEMAS;
use super::trait_def::{DatasetStore, ForeignKeyViolation};
use crate::sqlite_persistence::Table;
use anyhow::{bail, Context, Result};
use rusqlite::{params_from_iter, types::Value, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteDatasetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatasetStore {
    /// Open (or create) the database file at `db_path`. Tables are not
    /// created until `create_schema` is called.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open dataset database {:?}", db_path))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn insert_sql(table: &Table) -> String {
        let placeholders: Vec<String> = (1..=table.columns.len())
            .map(|index| format!("?{}", index))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            table.column_names().join(", "),
            placeholders.join(", ")
        )
    }
}

impl DatasetStore for SqliteDatasetStore {
    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let latest_version = DATASET_VERSIONED_SCHEMAS.len() - 1;
        let latest_schema = &DATASET_VERSIONED_SCHEMAS[latest_version];

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;
        if table_count == 0 {
            info!("Creating dataset db schema at version {}", latest_version);
        } else {
            debug!("Database already has {} tables", table_count);
        }

        latest_schema.create(&conn)?;
        latest_schema
            .validate(&conn)
            .context("Existing database does not match the dataset schema")?;
        Ok(())
    }

    fn bulk_insert(&self, table: &'static Table, rows: &[Vec<Value>]) -> Result<usize> {
        let arity = table.columns.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != arity) {
            bail!(
                "Row {} for table {} has {} values, expected {}",
                index,
                table.name,
                row.len(),
                arity
            );
        }

        let conn = self.conn.lock().unwrap();
        let own_transaction = conn.is_autocommit();
        if own_transaction {
            conn.execute("BEGIN IMMEDIATE", [])?;
        }

        let result = (|| -> Result<usize> {
            let mut stmt = conn.prepare_cached(&Self::insert_sql(table))?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter()))
                    .with_context(|| format!("Failed to insert into {}", table.name))?;
            }
            Ok(rows.len())
        })();

        match result {
            Ok(inserted) => {
                if own_transaction {
                    conn.execute("COMMIT", [])?;
                }
                debug!("Inserted {} rows into {}", inserted, table.name);
                Ok(inserted)
            }
            Err(e) => {
                if own_transaction {
                    let _ = conn.execute("ROLLBACK", []);
                }
                Err(e)
            }
        }
    }

    fn check_integrity(&self) -> Result<Vec<ForeignKeyViolation>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let violations = stmt
            .query_map([], |row| {
                Ok(ForeignKeyViolation {
                    table: row.get(0)?,
                    rowid: row.get(1)?,
                    parent: row.get(2)?,
                    fk_index: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(violations)
    }

    fn begin_import(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])
            .context("Failed to begin import transaction")?;
        Ok(())
    }

    fn commit_import(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        if let Err(e) = conn.execute("COMMIT", []) {
            let _ = conn.execute("ROLLBACK", []);
            return Err(e).context("Failed to commit import transaction");
        }
        Ok(())
    }

    fn rollback_import(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        if conn.is_autocommit() {
            return Ok(());
        }
        conn.execute("ROLLBACK", [])
            .context("Failed to roll back import transaction")?;
        Ok(())
    }

    fn count_rows(&self, table: &'static Table) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table.name), [], |r| {
            r.get(0)
        })?;
        Ok(count as usize)
    }

    fn sum_total_listens(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let sum: i64 = conn.query_row(
            "SELECT COALESCE(SUM(total_listens), 0) FROM Users",
            [],
            |r| r.get(0),
        )?;
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{ALBUMS_TABLE, ARTISTS_TABLE, USERS_TABLE};
    use crate::store::trait_def::ImportTransaction;

    fn artist_row(artist_id: i64, name: &str) -> Vec<Value> {
        vec![
            Value::Integer(artist_id),
            Value::Text(name.to_string()),
            Value::Text("Italy".to_string()),
        ]
    }

    fn store_with_schema() -> SqliteDatasetStore {
        let store = SqliteDatasetStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store
    }

    #[test]
    fn test_create_schema_twice() {
        let store = store_with_schema();
        store
            .bulk_insert(&ARTISTS_TABLE, &[artist_row(1, "Mina")])
            .unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 1);
    }

    #[test]
    fn test_create_schema_sets_user_version() {
        let store = store_with_schema();
        let conn = store.conn.lock().unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version as usize, crate::sqlite_persistence::BASE_DB_VERSION);
    }

    #[test]
    fn test_create_schema_rejects_incompatible_table() {
        let store = SqliteDatasetStore::open_in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute("CREATE TABLE Artists (artist_id TEXT PRIMARY KEY)", [])
                .unwrap();
        }
        assert!(store.create_schema().is_err());
    }

    #[test]
    fn test_bulk_insert_and_count() {
        let store = store_with_schema();
        let rows: Vec<Vec<Value>> = (1..=5).map(|id| artist_row(id, "Lucio Dalla")).collect();
        assert_eq!(store.bulk_insert(&ARTISTS_TABLE, &rows).unwrap(), 5);
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 5);
        assert_eq!(store.count_rows(&ALBUMS_TABLE).unwrap(), 0);
    }

    #[test]
    fn test_bulk_insert_rejects_wrong_arity() {
        let store = store_with_schema();
        let rows = vec![artist_row(1, "Mina"), vec![Value::Integer(2)]];
        let err = store.bulk_insert(&ARTISTS_TABLE, &rows).unwrap_err();
        assert!(err.to_string().contains("expected 3"));
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 0);
    }

    #[test]
    fn test_failed_bulk_insert_leaves_no_rows() {
        let store = store_with_schema();
        // second row repeats the primary key
        let rows = vec![artist_row(1, "Mina"), artist_row(1, "Mina")];
        assert!(store.bulk_insert(&ARTISTS_TABLE, &rows).is_err());
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 0);
    }

    #[test]
    fn test_foreign_keys_enforced_on_insert() {
        let store = store_with_schema();
        let album = vec![
            Value::Integer(1),
            Value::Text("Orphan Vol 1".to_string()),
            Value::Integer(99),
            Value::Text("Pop".to_string()),
            Value::Integer(2000),
        ];
        assert!(store.bulk_insert(&ALBUMS_TABLE, &[album]).is_err());
    }

    #[test]
    fn test_integrity_reports_dangling_reference() {
        let store = store_with_schema();
        assert!(store.check_integrity().unwrap().is_empty());
        {
            let conn = store.conn.lock().unwrap();
            conn.pragma_update(None, "foreign_keys", "OFF").unwrap();
            conn.execute(
                "INSERT INTO Albums (album_id, album_name, artist_id) VALUES (1, 'Orphan Vol 1', 42)",
                [],
            )
            .unwrap();
            conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        }

        let violations = store.check_integrity().unwrap();
        assert_eq!(
            violations,
            vec![ForeignKeyViolation {
                table: "Albums".to_string(),
                rowid: Some(1),
                parent: "Artists".to_string(),
                fk_index: 0,
            }]
        );
    }

    #[test]
    fn test_import_transaction_rolls_back_on_drop() {
        let store = store_with_schema();
        {
            let _tx = ImportTransaction::begin(&store).unwrap();
            store
                .bulk_insert(&ARTISTS_TABLE, &[artist_row(1, "Mina")])
                .unwrap();
        }
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 0);
    }

    #[test]
    fn test_import_transaction_commit() {
        let store = store_with_schema();
        let tx = ImportTransaction::begin(&store).unwrap();
        store
            .bulk_insert(&ARTISTS_TABLE, &[artist_row(1, "Mina")])
            .unwrap();
        tx.commit().unwrap();
        assert_eq!(store.count_rows(&ARTISTS_TABLE).unwrap(), 1);
    }

    #[test]
    fn test_sum_total_listens_on_empty_table() {
        let store = store_with_schema();
        assert_eq!(store.sum_total_listens().unwrap(), 0);
        let user = vec![
            Value::Integer(1),
            Value::Text("Ada Lovelace".to_string()),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Integer(7),
            Value::Null,
        ];
        store.bulk_insert(&USERS_TABLE, &[user]).unwrap();
        assert_eq!(store.sum_total_listens().unwrap(), 7);
    }
}
