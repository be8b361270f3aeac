use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{RelayError, RelayResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    guid TEXT NOT NULL PRIMARY KEY,
    title TEXT,
    link TEXT,
    pubDate TEXT,
    category TEXT
);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> RelayResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> RelayResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, RelayError> {
        self.conn
            .lock()
            .map_err(|_| RelayError::Database(rusqlite::Error::InvalidQuery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles_table_exists(storage: &SqliteStorage) -> bool {
        let conn = storage.connection().unwrap();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='articles')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_create_in_memory_storage() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(articles_table_exists(&storage));
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");

        let first = SqliteStorage::new(&path).unwrap();
        first
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO articles (guid, title) VALUES ('g1', 'T1')",
                [],
            )
            .unwrap();
        drop(first);

        let second = SqliteStorage::new(&path).unwrap();
        assert!(articles_table_exists(&second));
        let count: i64 = second
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
