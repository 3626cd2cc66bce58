//! The form controller.
//!
//! Owns the transient field state and the submission store, and drives the
//! camera, location and permission collaborators on behalf of the UI.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::collaborators::{
    Capability, CapturedPhoto, LocationProvider, PermissionGate, PhotoCapture, Position,
};
use crate::error::Result;
use crate::pending::Settled;
use crate::photo;
use crate::storage::SubmissionStore;
use crate::submission::{NewSubmission, Submission};

/// The text fields of the form, as currently typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Name field.
    pub name: String,
    /// Email field.
    pub email: String,
    /// Comment field.
    pub comment: String,
}

/// A user-visible message produced by a controller action.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The capability was denied; nothing was invoked.
    PermissionDenied(Capability),
    /// A photo was captured and stored at this locator.
    PhotoSaved(String),
    /// The capture was cancelled; the previous photo, if any, is kept.
    PhotoCancelled,
    /// A new position is available.
    LocationUpdated(Position),
    /// The platform has no last known position.
    LocationUnavailable,
    /// The location lookup failed.
    LocationFailed,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(Capability::Camera) => write!(f, "Camera permission denied"),
            Self::PermissionDenied(Capability::Location) => {
                write!(f, "Location permission denied")
            }
            Self::PhotoSaved(locator) => write!(f, "Image saved at: {locator}"),
            Self::PhotoCancelled => write!(f, "Photo capture cancelled"),
            Self::LocationUpdated(position) => write!(f, "{position}"),
            Self::LocationUnavailable => write!(f, "Could not get the location"),
            Self::LocationFailed => write!(f, "Error getting location"),
        }
    }
}

/// Result of pressing "Submit".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored with this id.
    Saved(i64),
    /// No photo has been taken yet, so nothing was stored.
    NoPhoto,
}

/// Drives one form: fields, photo, location, and the list of past entries.
#[derive(Debug)]
pub struct FormController<P, L, G> {
    store: SubmissionStore,
    photo_dir: PathBuf,
    camera: P,
    locator: L,
    permissions: G,
    fields: FormFields,
    photo: Option<CapturedPhoto>,
    location: Option<Position>,
    submissions: Vec<Submission>,
}

impl<P, L, G> FormController<P, L, G>
where
    P: PhotoCapture,
    L: LocationProvider,
    G: PermissionGate,
{
    /// Create a controller over an opened store.
    ///
    /// Photos are written under `photo_dir`.
    pub fn new(
        store: SubmissionStore,
        photo_dir: impl Into<PathBuf>,
        camera: P,
        locator: L,
        permissions: G,
    ) -> Self {
        Self {
            store,
            photo_dir: photo_dir.into(),
            camera,
            locator,
            permissions,
            fields: FormFields::default(),
            photo: None,
            location: None,
            submissions: Vec::new(),
        }
    }

    /// Update the name field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
    }

    /// Update the email field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.fields.email = email.into();
    }

    /// Update the comment field.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.fields.comment = comment.into();
    }

    /// Current field values.
    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// The last captured photo.
    #[must_use]
    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    /// The last location fix.
    #[must_use]
    pub fn location(&self) -> Option<Position> {
        self.location
    }

    /// Submissions as of the last submit or refresh.
    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    /// Take a photo, asking for camera permission first if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the photo directory cannot be created or read.
    pub async fn take_photo(&mut self) -> Result<Notice> {
        if !self.ensure_permission(Capability::Camera).await {
            return Ok(Notice::PermissionDenied(Capability::Camera));
        }

        let taken_at = chrono::Local::now().naive_local();
        let destination = photo::next_destination(&self.photo_dir, taken_at).await?;
        debug!("Requesting photo capture into {}", destination.display());

        match self.camera.capture(&destination).await {
            Settled::Resolved(photo) => {
                info!("Image saved at: {}", photo.locator);
                let notice = Notice::PhotoSaved(photo.locator.clone());
                self.photo = Some(photo);
                Ok(notice)
            }
            Settled::Cancelled => {
                debug!("Photo capture cancelled");
                Ok(Notice::PhotoCancelled)
            }
        }
    }

    /// Fetch the last known location, asking for permission first if needed.
    pub async fn fetch_location(&mut self) -> Notice {
        if !self.ensure_permission(Capability::Location).await {
            return Notice::PermissionDenied(Capability::Location);
        }

        match self.locator.last_known().await {
            Ok(Some(position)) => {
                debug!("Location updated: {}", position);
                self.location = Some(position);
                Notice::LocationUpdated(position)
            }
            Ok(None) => Notice::LocationUnavailable,
            Err(e) => {
                warn!("Error getting location: {}", e);
                Notice::LocationFailed
            }
        }
    }

    /// Store the current fields with the captured photo's locator.
    ///
    /// Without a photo nothing is stored. After a successful insert the list
    /// of submissions is reloaded.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the insert or the reload fails; the
    /// listing is left as it was.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let Some(photo) = &self.photo else {
            debug!("Submit pressed without a photo, nothing stored");
            return Ok(SubmitOutcome::NoPhoto);
        };

        let submission = NewSubmission::new(
            self.fields.name.as_str(),
            self.fields.email.as_str(),
            self.fields.comment.as_str(),
            photo.locator.as_str(),
        );
        let id = self.store.insert(&submission)?;
        self.refresh()?;
        Ok(SubmitOutcome::Saved(id))
    }

    /// Reload the list of submissions from the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the previous listing is kept.
    pub fn refresh(&mut self) -> Result<&[Submission]> {
        self.submissions = self.store.list_all()?;
        Ok(&self.submissions)
    }

    async fn ensure_permission(&self, capability: Capability) -> bool {
        if self.permissions.is_granted(capability) {
            return true;
        }
        let granted = self.permissions.request(capability).await;
        if !granted {
            warn!("Permission denied: {}", capability);
        }
        granted
    }
}
