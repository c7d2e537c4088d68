//! Local `SQLite` submission store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::records::{BloodRequestRecord, DonorRecord};

use super::{migrations, SubmissionStore};

/// Submission store backed by a local `SQLite` file.
///
/// The connection sits behind a shared mutex so the store can be used from
/// the HTTP service's tasks. Clones share the same connection. The async
/// inserts run on the blocking thread pool and never hold the lock across an
/// await point.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories as needed and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("database connection lock poisoned"))
    }

    /// Insert a donor row and return its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_donor_row(&self, record: &DonorRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO donors (
                full_name, age, gender, blood_type, contact_number,
                email, address, medical_history, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                record.full_name,
                record.age,
                record.gender.label(),
                record.blood_type.label(),
                record.contact_number,
                record.email,
                record.address,
                record.medical_history,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, blood_type = %record.blood_type, "Inserted donor");
        Ok(id)
    }

    /// Insert a blood request row and return its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_request_row(&self, record: &BloodRequestRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO blood_requests (
                name, contact_number, blood_type, quantity, hospital_name,
                patient_name, urgency, patient_condition, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                record.name,
                record.contact_number,
                record.blood_type.label(),
                record.quantity,
                record.hospital_name,
                record.patient_name,
                record.urgency.label(),
                record.patient_condition,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, urgency = %record.urgency, "Inserted blood request");
        Ok(id)
    }

    /// Gather counts for the status report.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock()?;

        let donors: i64 = conn.query_row("SELECT COUNT(*) FROM donors", [], |row| row.get(0))?;
        let blood_requests: i64 =
            conn.query_row("SELECT COUNT(*) FROM blood_requests", [], |row| row.get(0))?;

        let latest: Option<String> = conn
            .query_row(
                r"
                SELECT MAX(created_at) FROM (
                    SELECT created_at FROM donors
                    UNION ALL
                    SELECT created_at FROM blood_requests
                )
                ",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let latest_submission = latest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            donors,
            blood_requests,
            latest_submission,
            db_size_bytes,
        })
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_donor(&self, record: &DonorRecord) -> Result<()> {
        let store = self.clone();
        let record = record.clone();
        run_blocking(move || store.insert_donor_row(&record)).await
    }

    async fn insert_request(&self, record: &BloodRequestRecord) -> Result<()> {
        let store = self.clone();
        let record = record.clone();
        run_blocking(move || store.insert_request_row(&record)).await
    }
}

/// Run a row insert on the blocking pool, discarding the row id.
async fn run_blocking<F>(insert: F) -> Result<()>
where
    F: FnOnce() -> Result<i64> + Send + 'static,
{
    tokio::task::spawn_blocking(insert)
        .await
        .map_err(|err| Error::internal(format!("insert task failed: {err}")))?
        .map(|_| ())
}

/// Counts reported by `bloodbank status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Donor rows stored.
    pub donors: i64,
    /// Blood request rows stored.
    pub blood_requests: i64,
    /// Time of the most recent insert of either kind.
    pub latest_submission: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blood::{BloodType, Gender, Urgency};

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test store")
    }

    fn donor() -> DonorRecord {
        DonorRecord {
            full_name: "Ada Obi".to_string(),
            age: 30,
            gender: Gender::Female,
            blood_type: BloodType::ONegative,
            contact_number: "0801234567".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Marina Road".to_string(),
            medical_history: None,
        }
    }

    fn request() -> BloodRequestRecord {
        BloodRequestRecord {
            name: "Tunde Bello".to_string(),
            contact_number: "0809999999".to_string(),
            blood_type: BloodType::APositive,
            quantity: 3,
            hospital_name: "Lagos General".to_string(),
            patient_name: "Kemi Bello".to_string(),
            urgency: Urgency::Urgent,
            patient_condition: Some("Post-surgery".to_string()),
        }
    }

    #[test]
    fn test_insert_donor_row() {
        let store = create_test_store();
        let id = store.insert_donor_row(&donor()).unwrap();
        assert!(id > 0);

        let conn = store.lock().unwrap();
        let (blood_type, history): (String, Option<String>) = conn
            .query_row(
                "SELECT blood_type, medical_history FROM donors WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(blood_type, "O-");
        assert_eq!(history, None);
    }

    #[test]
    fn test_insert_request_row() {
        let store = create_test_store();
        let id = store.insert_request_row(&request()).unwrap();

        let conn = store.lock().unwrap();
        let (quantity, urgency, condition): (u32, String, Option<String>) = conn
            .query_row(
                "SELECT quantity, urgency, patient_condition FROM blood_requests WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(quantity, 3);
        assert_eq!(urgency, "Urgent");
        assert_eq!(condition.as_deref(), Some("Post-surgery"));
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let store = create_test_store();
        let first = store.insert_donor_row(&donor()).unwrap();
        let second = store.insert_donor_row(&donor()).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.stats().unwrap().donors, 2);
    }

    #[test]
    fn test_schema_rejects_out_of_range_age() {
        let store = create_test_store();
        let mut record = donor();
        record.age = 17;
        assert!(store.insert_donor_row(&record).is_err());
    }

    #[tokio::test]
    async fn test_trait_inserts() {
        let store = create_test_store();
        store.insert_donor(&donor()).await.unwrap();
        store.insert_request(&request()).await.unwrap();
        store.insert_request(&request()).await.unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.donors, 1);
        assert_eq!(stats.blood_requests, 2);
        assert!(stats.latest_submission.is_some());
        assert_eq!(store.name(), "sqlite");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_trait_inserts() {
        let store = create_test_store();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_donor(&donor()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.stats().unwrap().donors, 8);
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_store().stats().unwrap();
        assert_eq!(stats.donors, 0);
        assert_eq!(stats.blood_requests, 0);
        assert!(stats.latest_submission.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_path() {
        assert_eq!(create_test_store().path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("bloodbank_store_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let db_path = root.join("nested").join("bloodbank.db");

        let store = SqliteStore::open(&db_path).unwrap();
        store.insert_donor_row(&donor()).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.path(), db_path);
        assert!(store.stats().unwrap().db_size_bytes > 0);

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let db_path = std::env::temp_dir().join(format!(
            "bloodbank_reopen_test_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_path);

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.insert_request_row(&request()).unwrap();
        }
        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.stats().unwrap().blood_requests, 1);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }
}
