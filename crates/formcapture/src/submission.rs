//! Core submission types for formcapture.
//!
//! A submission is one stored form entry: three free-text fields plus the
//! locator of the photo that was taken for it.

use serde::{Deserialize, Serialize};

/// A stored form entry.
///
/// The store accepts any four strings; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Identifier assigned by the store at creation. Never reused.
    pub id: i64,

    /// Name as typed by the user.
    pub name: String,

    /// Email as typed by the user (no format check).
    pub email: String,

    /// Free-form comment.
    pub comment: String,

    /// Opaque locator of the captured photo, stored verbatim.
    pub photo_path: String,
}

impl std::fmt::Display for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Name: {}, Email: {}, Comment: {}",
            self.name, self.email, self.comment
        )
    }
}

/// The inputs of a single `create` call.
///
/// All four fields are required; empty strings are fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    /// Name field.
    pub name: String,
    /// Email field.
    pub email: String,
    /// Comment field.
    pub comment: String,
    /// Photo locator.
    pub photo_path: String,
}

impl NewSubmission {
    /// Build a new submission from its four text fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        comment: impl Into<String>,
        photo_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            comment: comment.into(),
            photo_path: photo_path.into(),
        }
    }

    /// Attach the id the store assigned, producing the stored record.
    #[must_use]
    pub fn with_id(self, id: i64) -> Submission {
        Submission {
            id,
            name: self.name,
            email: self.email,
            comment: self.comment,
            photo_path: self.photo_path,
        }
    }
}
