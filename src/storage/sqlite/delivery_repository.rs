use rusqlite::{ffi, OptionalExtension};

use crate::domain::DeliveryRecord;
use crate::errors::{RelayError, RelayResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{DeliveryStore, InsertOutcome};

pub struct SqliteDeliveryRepository {
    storage: SqliteStorage,
}

impl SqliteDeliveryRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl DeliveryStore for SqliteDeliveryRepository {
    fn exists(&self, guid: &str) -> RelayResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare_cached(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE guid = ?1)"
        )?;
        let exists: bool = stmt.query_row([guid], |row| row.get(0))?;
        Ok(exists)
    }

    fn insert(&self, record: &DeliveryRecord) -> RelayResult<InsertOutcome> {
        let conn = self.storage.connection()?;
        let result = conn.execute(
            "INSERT INTO articles (guid, title, link, pubDate, category) VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &record.guid,
                &record.title,
                &record.link,
                &record.pub_date,
                &record.category,
            ),
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            // Only the guid key counts as already delivered; other constraints are real failures
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(RelayError::Database(e)),
        }
    }

    fn get(&self, guid: &str) -> RelayResult<Option<DeliveryRecord>> {
        let conn = self.storage.connection()?;
        let record = conn
            .query_row(
                "SELECT guid, title, link, pubDate, category FROM articles WHERE guid = ?1",
                [guid],
                |row| {
                    Ok(DeliveryRecord {
                        guid: row.get(0)?,
                        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        link: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        pub_date: row.get(3)?,
                        category: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn count(&self) -> RelayResult<u64> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SqliteDeliveryRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteDeliveryRepository::new(storage)
    }

    fn record(guid: &str) -> DeliveryRecord {
        DeliveryRecord {
            guid: guid.to_string(),
            title: format!("Title {}", guid),
            link: format!("https://beteve.cat/{}", guid),
            pub_date: Some("2024-01-01T00:00:00.000Z".to_string()),
            category: Some(r#"["Barcelona","Cultura"]"#.to_string()),
        }
    }

    #[test]
    fn test_insert_and_exists() {
        let repo = setup();

        assert!(!repo.exists("g1").unwrap());
        assert_eq!(repo.insert(&record("g1")).unwrap(), InsertOutcome::Inserted);
        assert!(repo.exists("g1").unwrap());
        assert!(!repo.exists("g2").unwrap());
    }

    #[test]
    fn test_duplicate_insert_is_benign() {
        let repo = setup();

        assert_eq!(repo.insert(&record("g1")).unwrap(), InsertOutcome::Inserted);

        let mut second = record("g1");
        second.title = "Changed".to_string();
        assert_eq!(repo.insert(&second).unwrap(), InsertOutcome::Duplicate);

        // First write wins, nothing is updated
        let stored = repo.get("g1").unwrap().unwrap();
        assert_eq!(stored.title, "Title g1");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_other_constraint_failure_is_error() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_empty_guid BEFORE INSERT ON articles
                 WHEN NEW.guid = ''
                 BEGIN SELECT RAISE(ABORT, 'empty guid'); END;",
            )
            .unwrap();
        let repo = SqliteDeliveryRepository::new(storage);

        let result = repo.insert(&record(""));
        assert!(matches!(result, Err(RelayError::Database(_))), "{:?}", result);
        assert_eq!(repo.count().unwrap(), 0);

        // The guid key still reports duplicates
        assert_eq!(repo.insert(&record("g1")).unwrap(), InsertOutcome::Inserted);
        assert_eq!(repo.insert(&record("g1")).unwrap(), InsertOutcome::Duplicate);
    }

    #[test]
    fn test_get_round_trips_nulls() {
        let repo = setup();

        let mut r = record("g1");
        r.pub_date = None;
        r.category = None;
        repo.insert(&r).unwrap();

        assert_eq!(repo.get("g1").unwrap(), Some(r));
        assert_eq!(repo.get("missing").unwrap(), None);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");

        {
            let repo = SqliteDeliveryRepository::new(SqliteStorage::new(&path).unwrap());
            repo.insert(&record("g1")).unwrap();
        }

        let repo = SqliteDeliveryRepository::new(SqliteStorage::new(&path).unwrap());
        assert!(repo.exists("g1").unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }
}
