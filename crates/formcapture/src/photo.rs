//! Destination locators for captured photos.
//!
//! Photos are named after the moment the capture was requested,
//! `JPEG_<yyyyMMdd_HHmmss>.jpg`, with a `_<n>` suffix when several captures
//! land in the same second.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::Result;

/// File name for a photo taken at `taken_at`; `seq` 0 means no suffix.
#[must_use]
pub fn photo_file_name(taken_at: NaiveDateTime, seq: u32) -> String {
    let stamp = taken_at.format("%Y%m%d_%H%M%S");
    if seq == 0 {
        format!("JPEG_{stamp}.jpg")
    } else {
        format!("JPEG_{stamp}_{seq}.jpg")
    }
}

/// Pick an unused destination in `dir` for a photo taken at `taken_at`.
///
/// Creates `dir` if it does not exist yet. The file itself is left for the
/// capture collaborator to write.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or probed.
pub async fn next_destination(dir: &Path, taken_at: NaiveDateTime) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let mut seq = 0;
    loop {
        let candidate = dir.join(photo_file_name(taken_at, seq));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        seq += 1;
    }
}
