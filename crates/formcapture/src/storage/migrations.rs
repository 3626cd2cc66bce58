//! Schema versioning for formcapture.
//!
//! There is no data migration. The version lives in the `SQLite`
//! `user_version` header field; when it differs from the expected version the
//! submissions table is dropped and recreated from scratch.

use rusqlite::Connection;
use tracing::{debug, info};

use super::schema::{CREATE_FORM_DATA_TABLE, DROP_FORM_DATA_TABLE};

/// The current schema version.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// What `ensure_schema` had to do to bring the file up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// The stored version already matched; existing rows were kept.
    Unchanged,
    /// The stored version differed; the table was rebuilt and is now empty.
    Recreated {
        /// The version found in the file (0 for a brand new file).
        from: i32,
    },
}

/// Make sure the submissions table exists at `expected` version.
///
/// # Errors
///
/// Returns an error if reading the version or rebuilding the table fails.
pub fn ensure_schema(conn: &Connection, expected: i32) -> rusqlite::Result<SchemaAction> {
    let stored = get_schema_version(conn)?;
    if stored == expected {
        // Covers a file whose table was removed behind our back.
        conn.execute(CREATE_FORM_DATA_TABLE, [])?;
        debug!("Schema version {} matches, keeping data", stored);
        return Ok(SchemaAction::Unchanged);
    }

    recreate(conn, expected)?;
    if stored != 0 {
        info!(
            "Schema version changed from {} to {}, submissions table recreated",
            stored, expected
        );
    }
    Ok(SchemaAction::Recreated { from: stored })
}

/// Drop and recreate the submissions table, stamping `version`.
///
/// Runs in a single transaction so a failure leaves the old table intact.
///
/// # Errors
///
/// Returns an error if any statement fails or the commit does not go through.
pub fn recreate(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(DROP_FORM_DATA_TABLE, [])?;
    tx.execute(CREATE_FORM_DATA_TABLE, [])?;
    set_schema_version(&tx, version)?;
    tx.commit()
}

/// Read the schema version from the file header.
///
/// Returns 0 for a fresh database.
pub(crate) fn get_schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    // PRAGMA arguments cannot be bound as parameters.
    conn.execute_batch(&format!("PRAGMA user_version = {version}"))
}
