//! Storage layer for formcapture.
//!
//! This module provides the `SQLite`-backed submission store. The store is a
//! small state machine (`Closed` / `Open`); while open it only remembers where
//! the database lives. Every operation opens its own connection, does its
//! work, and closes the connection again before returning.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::submission::{NewSubmission, Submission};

pub use migrations::{SchemaAction, CURRENT_SCHEMA_VERSION};

/// Well-known database file name.
pub const DATABASE_FILE_NAME: &str = "formdata.db";

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoreState {
    Closed,
    Open { path: PathBuf, schema_version: i32 },
}

/// Local store of form submissions.
///
/// Starts `Closed`. [`initialize`](Self::initialize) opens it; every other
/// operation fails with [`Error::NotOpen`] until then, and again after
/// [`close`](Self::close).
#[derive(Debug)]
pub struct SubmissionStore {
    state: StoreState,
}

impl Default for SubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionStore {
    /// Create a closed store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: StoreState::Closed,
        }
    }

    /// Create a store and initialize it at `path` in one step.
    ///
    /// # Errors
    ///
    /// Same as [`initialize`](Self::initialize).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.initialize(path)?;
        Ok(store)
    }

    /// Open (creating if absent) the database at `path` with the current
    /// schema version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file or its directory cannot
    /// be created or opened.
    pub fn initialize(&mut self, path: impl AsRef<Path>) -> Result<SchemaAction> {
        self.initialize_with_version(path, CURRENT_SCHEMA_VERSION)
    }

    /// Open the database at `path`, expecting `schema_version`.
    ///
    /// If the file carries a different version, the submissions table is
    /// dropped and recreated and all prior rows are gone. On failure the
    /// store keeps whatever state it had before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file or its directory cannot
    /// be created or opened, or the schema cannot be set up.
    pub fn initialize_with_version(
        &mut self,
        path: impl AsRef<Path>,
        schema_version: i32,
    ) -> Result<SchemaAction> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| Error::storage_unavailable(&path, source))?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn =
            Connection::open(&path).map_err(|source| Error::storage_unavailable(&path, source))?;

        let action = migrations::ensure_schema(&conn, schema_version)
            .map_err(|source| Error::storage_unavailable(&path, source))?;
        conn.close()
            .map_err(|(_, source)| Error::storage_unavailable(&path, source))?;

        info!(
            "Submission store opened at {} (schema version {})",
            path.display(),
            schema_version
        );
        self.state = StoreState::Open {
            path,
            schema_version,
        };
        Ok(action)
    }

    /// Return to the `Closed` state. Closing a closed store is a no-op.
    pub fn close(&mut self) {
        if let StoreState::Open { path, .. } = &self.state {
            debug!("Closing submission store at {}", path.display());
        }
        self.state = StoreState::Closed;
    }

    /// Whether the store is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, StoreState::Open { .. })
    }

    /// Path of the database file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed.
    pub fn path(&self) -> Result<&Path> {
        match &self.state {
            StoreState::Open { path, .. } => Ok(path),
            StoreState::Closed => Err(Error::NotOpen),
        }
    }

    /// Schema version the store was opened with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed.
    pub fn schema_version(&self) -> Result<i32> {
        match &self.state {
            StoreState::Open { schema_version, .. } => Ok(*schema_version),
            StoreState::Closed => Err(Error::NotOpen),
        }
    }

    /// Size of the database file on disk, in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, or [`Error::Io`] if
    /// the file cannot be inspected.
    pub fn size_bytes(&self) -> Result<u64> {
        let path = self.path()?;
        Ok(std::fs::metadata(path)?.len())
    }

    /// Append one submission and return its freshly assigned id.
    ///
    /// The row is committed with `synchronous = FULL` before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, or
    /// [`Error::WriteFailed`] if the insert did not commit.
    pub fn create(&self, name: &str, email: &str, comment: &str, photo_path: &str) -> Result<i64> {
        let conn = self.connect().map_err(|e| e.into_write())?;

        conn.execute(
            schema::INSERT_SUBMISSION,
            params![name, email, comment, photo_path],
        )
        .map_err(Error::WriteFailed)?;
        let id = conn.last_insert_rowid();

        conn.close().map_err(|(_, source)| Error::WriteFailed(source))?;
        debug!("Inserted submission with id {}", id);
        Ok(id)
    }

    /// [`create`](Self::create) taking the fields as one value.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn insert(&self, submission: &NewSubmission) -> Result<i64> {
        self.create(
            &submission.name,
            &submission.email,
            &submission.comment,
            &submission.photo_path,
        )
    }

    /// Every stored submission, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, or
    /// [`Error::ReadFailed`] if the database cannot be read.
    pub fn list_all(&self) -> Result<Vec<Submission>> {
        let conn = self.connect().map_err(|e| e.into_read())?;

        let submissions = {
            let mut stmt = conn
                .prepare(schema::SELECT_ALL_SUBMISSIONS)
                .map_err(Error::ReadFailed)?;
            let rows = stmt
                .query_map([], Self::row_to_submission)
                .map_err(Error::ReadFailed)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::ReadFailed)?
        };

        conn.close().map_err(|(_, source)| Error::ReadFailed(source))?;
        debug!("Listed {} submissions", submissions.len());
        Ok(submissions)
    }

    /// Destroy and recreate the submissions table, deleting every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, or
    /// [`Error::WriteFailed`] if the rebuild did not commit.
    pub fn reset(&self) -> Result<()> {
        let version = self.schema_version()?;
        let conn = self.connect().map_err(|e| e.into_write())?;

        migrations::recreate(&conn, version).map_err(Error::WriteFailed)?;
        conn.close().map_err(|(_, source)| Error::WriteFailed(source))?;

        info!("Submission table reset");
        Ok(())
    }

    /// Open a fresh connection to the existing database file.
    ///
    /// The file is not created here: if it vanished since `initialize`, the
    /// open fails instead of silently producing an empty database.
    fn connect(&self) -> std::result::Result<Connection, ConnectError> {
        let path = self.path().map_err(|_| ConnectError::NotOpen)?;

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(ConnectError::Sqlite)?;
        conn.execute_batch("PRAGMA synchronous = FULL;")
            .map_err(ConnectError::Sqlite)?;
        Ok(conn)
    }

    /// Convert a database row to a Submission.
    ///
    /// NULL columns read back as empty strings.
    fn row_to_submission(row: &rusqlite::Row) -> rusqlite::Result<Submission> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };

        Ok(Submission {
            id: row.get(0)?,
            name: text(1)?,
            email: text(2)?,
            comment: text(3)?,
            photo_path: text(4)?,
        })
    }
}

/// Failure to obtain a per-operation connection, before it is classified as a
/// read or a write failure.
#[derive(Debug)]
enum ConnectError {
    NotOpen,
    Sqlite(rusqlite::Error),
}

impl ConnectError {
    fn into_write(self) -> Error {
        match self {
            Self::NotOpen => Error::NotOpen,
            Self::Sqlite(e) => Error::WriteFailed(e),
        }
    }

    fn into_read(self) -> Error {
        match self {
            Self::NotOpen => Error::NotOpen,
            Self::Sqlite(e) => Error::ReadFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SubmissionStore) {
        init_test_logging();
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = SubmissionStore::open(dir.path().join(DATABASE_FILE_NAME))
            .expect("failed to create test storage");
        (dir, store)
    }

    fn fields(s: &Submission) -> (&str, &str, &str, &str) {
        (&s.name, &s.email, &s.comment, &s.photo_path)
    }

    #[test]
    fn test_new_store_is_closed() {
        let store = SubmissionStore::new();
        assert!(!store.is_open());
        assert!(store.path().unwrap_err().is_not_open());
        assert!(store.schema_version().unwrap_err().is_not_open());
    }

    #[test]
    fn test_operations_before_initialize_fail_not_open() {
        let store = SubmissionStore::new();

        assert!(store.create("a", "b", "c", "d").unwrap_err().is_not_open());
        assert!(store.list_all().unwrap_err().is_not_open());
        assert!(store.reset().unwrap_err().is_not_open());
    }

    #[test]
    fn test_operations_after_close_fail_not_open() {
        let (_dir, mut store) = create_test_store();
        store.create("a", "b", "c", "d").unwrap();

        store.close();
        assert!(!store.is_open());
        assert!(store.create("a", "b", "c", "d").unwrap_err().is_not_open());
        assert!(store.list_all().unwrap_err().is_not_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_dir, mut store) = create_test_store();
        store.close();
        store.close();
        assert!(!store.is_open());

        let mut never_opened = SubmissionStore::default();
        never_opened.close();
        assert!(!never_opened.is_open());
    }

    #[test]
    fn test_fresh_store_lists_nothing() {
        let (_dir, store) = create_test_store();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_scenario_two_submissions() {
        let (_dir, store) = create_test_store();

        let id1 = store
            .create("Ana", "ana@x.com", "hello", "/tmp/p1.jpg")
            .unwrap();
        let id2 = store.create("Bo", "bo@x.com", "hi", "/tmp/p2.jpg").unwrap();
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);

        let all = store.list_all().unwrap();
        assert_eq!(
            all,
            vec![
                NewSubmission::new("Ana", "ana@x.com", "hello", "/tmp/p1.jpg").with_id(1),
                NewSubmission::new("Bo", "bo@x.com", "hi", "/tmp/p2.jpg").with_id(2),
            ]
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_dir, store) = create_test_store();

        for name in ["A", "B", "C"] {
            store.create(name, "", "", "").unwrap();
        }

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_create_then_list_returns_input_with_larger_id() {
        let (_dir, store) = create_test_store();
        let inputs = [
            ("", "", "", ""),
            ("Ana", "not-an-email", "", "content://photos/1"),
            ("Zoë", "zoë@exämple.com", "olá 世界 🌍", "/sdcard/Pictures/JPEG_1.jpg"),
            ("Ana", "ana@x.com", "same again", "/tmp/p1.jpg"),
            ("Ana", "ana@x.com", "same again", "/tmp/p1.jpg"),
            ("'; DROP TABLE FormData; --", "\"", "\n\t", "?1"),
        ];

        let mut max_id = 0;
        for (name, email, comment, photo) in inputs {
            let id = store.create(name, email, comment, photo).unwrap();
            assert!(id > max_id);
            max_id = id;

            let all = store.list_all().unwrap();
            let last = all.last().unwrap();
            assert_eq!(last.id, id);
            assert_eq!(fields(last), (name, email, comment, photo));
        }
        assert_eq!(store.list_all().unwrap().len(), inputs.len());
    }

    #[test]
    fn test_large_comment() {
        let (_dir, store) = create_test_store();
        let comment = "x".repeat(100_000);

        store.create("Ana", "", &comment, "").unwrap();
        assert_eq!(store.list_all().unwrap()[0].comment.len(), 100_000);
    }

    #[test]
    fn test_insert_new_submission() {
        let (_dir, store) = create_test_store();
        let new = NewSubmission::new("Ana", "ana@x.com", "hello", "/tmp/p1.jpg");

        let id = store.insert(&new).unwrap();
        assert_eq!(store.list_all().unwrap(), vec![new.with_id(id)]);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATABASE_FILE_NAME);

        {
            let store = SubmissionStore::open(&path).unwrap();
            store.create("Ana", "ana@x.com", "hello", "/tmp/p1.jpg").unwrap();
        }

        let mut store = SubmissionStore::new();
        let action = store.initialize(&path).unwrap();
        assert_eq!(action, SchemaAction::Unchanged);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ana");

        let id = store.create("Bo", "", "", "").unwrap();
        assert_eq!(id, 2);
    }

    #[test]
    fn test_reinitialize_same_version_keeps_data() {
        let (dir, mut store) = create_test_store();
        store.create("Ana", "", "", "").unwrap();

        let action = store
            .initialize(dir.path().join(DATABASE_FILE_NAME))
            .unwrap();
        assert_eq!(action, SchemaAction::Unchanged);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_reinitialize_mismatched_version_wipes_data() {
        let (dir, mut store) = create_test_store();
        let path = dir.path().join(DATABASE_FILE_NAME);
        store.create("Ana", "", "", "").unwrap();
        store.create("Bo", "", "", "").unwrap();
        store.close();

        let action = store.initialize_with_version(&path, 2).unwrap();
        assert_eq!(action, SchemaAction::Recreated { from: 1 });
        assert_eq!(store.schema_version().unwrap(), 2);
        assert!(store.list_all().unwrap().is_empty());

        store.create("Cy", "", "", "").unwrap();
        let action = store.initialize_with_version(&path, 2).unwrap();
        assert_eq!(action, SchemaAction::Unchanged);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_fresh_file_reports_recreated_from_zero() {
        let dir = TempDir::new().unwrap();
        let mut store = SubmissionStore::new();

        let action = store
            .initialize(dir.path().join(DATABASE_FILE_NAME))
            .unwrap();
        assert_eq!(action, SchemaAction::Recreated { from: 0 });
        assert_eq!(store.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("deeper").join(DATABASE_FILE_NAME);

        let store = SubmissionStore::open(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(store.path().unwrap(), nested);
    }

    #[test]
    fn test_initialize_unusable_location_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();

        let mut store = SubmissionStore::new();
        let err = store
            .initialize(blocker.join(DATABASE_FILE_NAME))
            .unwrap_err();
        assert!(err.is_storage_unavailable(), "unexpected error: {err}");
        assert!(!store.is_open());
    }

    #[test]
    fn test_failed_initialize_keeps_previous_state() {
        let (dir, mut store) = create_test_store();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();

        assert!(store.initialize(blocker.join(DATABASE_FILE_NAME)).is_err());
        assert!(store.is_open());
        assert_eq!(
            store.path().unwrap(),
            dir.path().join(DATABASE_FILE_NAME)
        );
    }

    #[test]
    fn test_initialize_garbage_file_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATABASE_FILE_NAME);
        std::fs::write(&path, "this is not a database ".repeat(200)).unwrap();

        let err = SubmissionStore::open(&path).unwrap_err();
        assert!(err.is_storage_unavailable(), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_file_after_open_fails_read_and_write() {
        let (dir, store) = create_test_store();
        std::fs::remove_file(dir.path().join(DATABASE_FILE_NAME)).unwrap();

        assert!(matches!(store.list_all(), Err(Error::ReadFailed(_))));
        assert!(matches!(
            store.create("a", "b", "c", "d"),
            Err(Error::WriteFailed(_))
        ));
    }

    #[test]
    fn test_size_bytes() {
        let (dir, mut store) = create_test_store();
        assert!(store.size_bytes().unwrap() > 0);

        std::fs::remove_file(dir.path().join(DATABASE_FILE_NAME)).unwrap();
        assert!(matches!(store.size_bytes(), Err(Error::Io(_))));

        store.close();
        assert!(store.size_bytes().unwrap_err().is_not_open());
    }

    #[test]
    fn test_corrupted_file_fails_read() {
        let (dir, store) = create_test_store();
        std::fs::write(
            dir.path().join(DATABASE_FILE_NAME),
            "this is not a database ".repeat(200),
        )
        .unwrap();

        assert!(matches!(store.list_all(), Err(Error::ReadFailed(_))));
    }

    #[test]
    fn test_reset_deletes_everything() {
        let (_dir, store) = create_test_store();
        store.create("Ana", "", "", "").unwrap();
        store.create("Bo", "", "", "").unwrap();

        store.reset().unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);

        store.create("Cy", "", "", "").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let (dir, store) = create_test_store();
        let conn = Connection::open(dir.path().join(DATABASE_FILE_NAME)).unwrap();
        conn.execute("INSERT INTO FormData (name) VALUES ('Ana')", [])
            .unwrap();
        drop(conn);

        let all = store.list_all().unwrap();
        assert_eq!(fields(&all[0]), ("Ana", "", "", ""));
    }

    #[test]
    fn test_reads_file_stamped_by_platform_helper() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATABASE_FILE_NAME);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE FormData (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT, email TEXT, comment TEXT, photo_path TEXT
            );
            INSERT INTO FormData (name, email, comment, photo_path)
                VALUES ('Ana', 'ana@x.com', 'hello', '/tmp/p1.jpg');
            PRAGMA user_version = 1;",
        )
        .unwrap();
        drop(conn);

        let store = SubmissionStore::open(&path).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].to_string(), "Name: Ana, Email: ana@x.com, Comment: hello");
    }
}
