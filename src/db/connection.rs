use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Handle to the in-memory book table. The handle owns at most one connection;
/// callers pass it to every operation instead of reaching for global state.
///
/// Nothing here synchronizes access. Mutating operations take `&mut self`, so
/// sharing a store across threads means wrapping it in the caller's own lock.
pub struct BookStore {
    schema_path: PathBuf,
    conn: Option<Connection>,
}

impl BookStore {
    /// Create an uninitialized store bound to the configured schema script.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            schema_path: config.schema_path.clone(),
            conn: None,
        }
    }

    /// Create a store and load it from the configured data script.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mut store = Self::new(config);
        store.initialize(&config.data_path)?;
        Ok(store)
    }

    /// Replace the store contents with a fresh database built from the schema
    /// script followed by `data_path`. The new database is fully built before
    /// the old one is dropped, so on failure the previous state (loaded or
    /// not) is left untouched.
    pub fn initialize(&mut self, data_path: &Path) -> Result<()> {
        let schema = read_script(&self.schema_path)?;
        let data = read_script(data_path)?;

        let conn = Connection::open_in_memory().map_err(StoreError::Connection)?;
        run_script(&conn, &self.schema_path, &schema)?;
        run_script(&conn, data_path, &data)?;

        if self.conn.replace(conn).is_some() {
            debug!(source = %data_path.display(), "replaced existing book store");
        } else {
            debug!(source = %data_path.display(), "initialized book store");
        }
        Ok(())
    }

    /// Drop the connection and return to the uninitialized state.
    pub fn close(&mut self) {
        self.conn = None;
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Schema script run ahead of every data script.
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Borrow the live connection, failing when the store was never loaded.
    pub(crate) fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotInitialized)
    }
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| StoreError::Script {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

fn run_script(conn: &Connection, path: &Path, sql: &str) -> Result<()> {
    conn.execute_batch(sql).map_err(|err| StoreError::Script {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seeded_store, write_script, SCHEMA};
    use tempfile::TempDir;

    #[test]
    fn new_store_starts_uninitialized() {
        let store = BookStore::new(&StoreConfig::default());
        assert!(!store.is_open());
        assert!(matches!(store.all_books(), Err(StoreError::NotInitialized)));
    }

    #[test]
    fn initialize_runs_schema_then_data() {
        let (store, _dir) = seeded_store(
            "INSERT INTO BOOKS VALUES (1, 'Dune', 'Herbert', 'Ace', 1965, 'desert planet');",
        );
        assert!(store.is_open());
        assert_eq!(store.all_books().unwrap().len(), 1);
    }

    #[test]
    fn reinitialize_is_a_full_reset() {
        let (mut store, dir) = seeded_store(
            "INSERT INTO BOOKS VALUES (1, 'Dune', 'Herbert', 'Ace', 1965, NULL);",
        );
        let other = write_script(
            &dir,
            "other.sql",
            "INSERT INTO BOOKS VALUES (5, 'Emma', 'Austen', 'Murray', 1815, NULL);",
        );
        store.initialize(&other).unwrap();

        let ids: Vec<i64> = store.all_books().unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn failed_reload_keeps_previous_store() {
        let (mut store, dir) = seeded_store(
            "INSERT INTO BOOKS VALUES (1, 'Dune', 'Herbert', 'Ace', 1965, NULL);",
        );
        let broken = write_script(&dir, "broken.sql", "INSERT INTO NOPE VALUES (1);");

        let err = store.initialize(&broken).unwrap_err();
        assert!(matches!(err, StoreError::Script { ref path, .. } if *path == broken));
        assert!(store.is_open());
        assert_eq!(store.all_books().unwrap().len(), 1);
    }

    #[test]
    fn missing_script_is_a_script_error() {
        let dir = TempDir::new().unwrap();
        let schema = write_script(&dir, "schema.sql", SCHEMA);
        let config = StoreConfig {
            schema_path: schema,
            data_path: dir.path().join("missing.sql"),
        };

        let err = BookStore::open(&config).err().unwrap();
        assert!(matches!(err, StoreError::Script { .. }));
    }

    #[test]
    fn close_returns_to_uninitialized() {
        let (mut store, _dir) = seeded_store("");
        store.close();
        assert!(!store.is_open());
        assert!(matches!(store.delete_book(1), Err(StoreError::NotInitialized)));
    }
}
