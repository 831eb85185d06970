use memopad_core::db::migrations::{apply_migrations, latest_version};
use memopad_core::db::{open_db, open_db_in_memory, DbError};
use memopad_core::store::{SqliteCategoryStore, SqliteMemoStore, SqliteTagStore};

#[test]
fn latest_version_is_positive() {
    assert!(latest_version() > 0);
}

#[test]
fn fresh_database_migrates_to_latest_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn migrations_are_idempotent_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memopad.db");

    {
        let _conn = open_db(&path).unwrap();
    }
    let conn = open_db(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn stores_reject_uninitialized_connections() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteCategoryStore::try_new(&conn).is_err());
    assert!(SqliteMemoStore::try_new(&conn).is_err());
    assert!(SqliteTagStore::try_new(&conn).is_err());
}

#[test]
fn migrated_connections_carry_all_store_tables() {
    let conn = open_db_in_memory().unwrap();
    assert!(SqliteCategoryStore::try_new(&conn).is_ok());
    assert!(SqliteMemoStore::try_new(&conn).is_ok());
    assert!(SqliteTagStore::try_new(&conn).is_ok());
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}
