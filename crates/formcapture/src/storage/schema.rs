//! `SQLite` schema definitions for formcapture.
//!
//! A single table holds every submission. All text columns are nullable so
//! files written by other tools stay readable.

/// Name of the submissions table.
pub const TABLE_NAME: &str = "FormData";

/// SQL statement to create the submissions table.
pub const CREATE_FORM_DATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS FormData (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    comment TEXT,
    photo_path TEXT
)
";

/// SQL statement to drop the submissions table.
pub const DROP_FORM_DATA_TABLE: &str = "DROP TABLE IF EXISTS FormData";

/// SQL statement to append one submission.
pub const INSERT_SUBMISSION: &str = r"
INSERT INTO FormData (name, email, comment, photo_path)
VALUES (?1, ?2, ?3, ?4)
";

/// SQL statement to read every submission in insertion order.
pub const SELECT_ALL_SUBMISSIONS: &str = r"
SELECT id, name, email, comment, photo_path
FROM FormData ORDER BY id ASC
";
