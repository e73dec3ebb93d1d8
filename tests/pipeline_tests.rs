//! End-to-end runs against database files on disk.

use pezzottify_dataset::config::{ConfigError, EntityCounts};
use pezzottify_dataset::dataset::GenerationError;
use pezzottify_dataset::{
    run_pipeline, DatasetStore, GenerationSettings, PipelineError, SqliteDatasetStore,
};
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

fn small_settings(seed: u64) -> GenerationSettings {
    GenerationSettings {
        seed,
        counts: EntityCounts {
            artists: 15,
            albums: 40,
            songs: 120,
            users: 150,
            plays: 900,
        },
        min_users: 100,
        ..Default::default()
    }
}

fn dump_table(db_path: &Path, table: &str) -> Vec<String> {
    let conn = Connection::open(db_path).unwrap();
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {} ORDER BY 1, 2, 3", table))
        .unwrap();
    let column_count = stmt.column_count();
    stmt.query_map([], |row| {
        let mut cells = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value: rusqlite::types::Value = row.get(index)?;
            cells.push(format!("{:?}", value));
        }
        Ok(cells.join("|"))
    })
    .unwrap()
    .collect::<rusqlite::Result<Vec<_>>>()
    .unwrap()
}

#[test]
fn test_same_seed_produces_identical_databases() {
    let temp_dir = TempDir::new().unwrap();
    let first_path = temp_dir.path().join("first.db");
    let second_path = temp_dir.path().join("second.db");

    let settings = small_settings(2024);
    run_pipeline(&settings, &SqliteDatasetStore::open(&first_path).unwrap()).unwrap();
    run_pipeline(&settings, &SqliteDatasetStore::open(&second_path).unwrap()).unwrap();

    for table in ["Artists", "Albums", "Songs", "Users", "Plays"] {
        let first = dump_table(&first_path, table);
        let second = dump_table(&second_path, table);
        assert!(!first.is_empty(), "{} is empty", table);
        assert_eq!(first, second, "{} differs between runs", table);
    }
}

#[test]
fn test_persisted_totals_match_play_table() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("music_streaming.db");
    let store = SqliteDatasetStore::open(&db_path).unwrap();

    let report = run_pipeline(&small_settings(9), &store).unwrap();
    assert_eq!(report.total_listens, 900);
    assert!(store.check_integrity().unwrap().is_empty());

    let conn = Connection::open(&db_path).unwrap();
    let mismatches: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM Users u
             WHERE u.total_listens != (SELECT COUNT(*) FROM Plays p WHERE p.user_id = u.user_id)",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(mismatches, 0);

    let gaps: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM (
                SELECT user_id, song_id FROM Plays
                GROUP BY user_id, song_id
                HAVING MAX(session_no) != COUNT(*) OR MIN(session_no) != 1
             )",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(gaps, 0);
}

#[test]
fn test_population_below_floor_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("music_streaming.db");
    let store = SqliteDatasetStore::open(&db_path).unwrap();

    let mut settings = GenerationSettings::default();
    settings.counts.users = 500;
    let result = run_pipeline(&settings, &store);

    assert!(matches!(
        result,
        Err(PipelineError::Generation(GenerationError::Config(
            ConfigError::BelowPopulationFloor { .. }
        )))
    ));
    let conn = Connection::open(&db_path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn test_second_run_into_same_file_fails_without_changes() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("music_streaming.db");
    let settings = small_settings(5);

    run_pipeline(&settings, &SqliteDatasetStore::open(&db_path).unwrap()).unwrap();
    let before = dump_table(&db_path, "Plays");

    // same ids again collide with the primary keys, the import rolls back
    let result = run_pipeline(&settings, &SqliteDatasetStore::open(&db_path).unwrap());
    assert!(matches!(result, Err(PipelineError::Persistence(_))));
    assert_eq!(dump_table(&db_path, "Plays"), before);
}
