//! Sqlite-backed key-value store.
//!
//! ## Migration System
//!
//! Schema setup is version-gated: each migration checks the recorded schema
//! version before running, executes once, and records the new version in
//! `db_version`. Opening an already-migrated store is a no-op.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KeyValueStore, StoreError};

/// Current schema version for the store database.
/// Increment this when adding a new migration.
pub const STORE_DB_VERSION: i32 = 1;

/// Durable store over a single sqlite `kv` table
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path).map_err(backend)?;
        init_schema(&conn).map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Private throwaway store, handy for quick experiments
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        init_schema(&conn).map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(backend)?;
        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    source: e,
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value.to_string(), chrono::Utc::now().to_rfc3339()],
        )
        .map_err(backend)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(backend)?;
        Ok(())
    }
}

/// Initialize the store schema with version-gated migrations
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    // Bootstrap: ensure db_version table exists (needed to check version)
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("store schema version: {}", current_version);

    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }

    Ok(())
}

/// v0→v1: Create the kv table
fn migrate_v0_to_v1(conn: &Connection) -> rusqlite::Result<()> {
    tracing::info!("Running migration v0→v1: Create kv table");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    record_version(conn, 1, "Create kv table")?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM db_version",
        [],
        |row| row.get(0),
    )
}

fn record_version(conn: &Connection, version: i32, description: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, chrono::Utc::now().to_rfc3339(), description],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;
    use serde_json::json;

    #[test]
    fn test_set_get_remove_round_trip() {
        let env = TestEnv::new().unwrap();

        assert!(env.store.get("missing").unwrap().is_none());

        env.store.set("user", &json!({"id": 7})).unwrap();
        assert_eq!(env.store.get("user").unwrap(), Some(json!({"id": 7})));

        env.store.remove("user").unwrap();
        assert!(env.store.get("user").unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let env = TestEnv::new().unwrap();

        env.store.set("courses", &json!([1, 2])).unwrap();
        env.store.set("courses", &json!([3])).unwrap();
        assert_eq!(env.store.get("courses").unwrap(), Some(json!([3])));
    }

    #[test]
    fn test_survives_reopen() {
        let env = TestEnv::new().unwrap();
        let path = env.path().join("store.db");

        env.store.set("users", &json!([{"id": 1}])).unwrap();
        drop(env.store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("users").unwrap(), Some(json!([{"id": 1}])));
    }

    #[test]
    fn test_corrupt_document_reported() {
        let env = TestEnv::new().unwrap();
        {
            let conn = env.store.lock().unwrap();
            conn.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES ('user', 'not json', '')",
                [],
            )
            .unwrap();
        }
        assert!(matches!(
            env.store.get("user"),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
