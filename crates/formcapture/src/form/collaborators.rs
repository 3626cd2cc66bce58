//! Platform capabilities the form controller depends on.
//!
//! Camera, location and the permission gate live outside this crate. They
//! are consumed through the traits below; [`CallbackCamera`] and
//! [`CallbackLocation`] adapt callback-style platform APIs to them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pending::{pending, Resolver, Settled};

/// A capability guarded by the platform's permission system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Taking photos.
    Camera,
    /// Reading the device position.
    Location,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// A geographic fix, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Latitude: {}, Longitude: {}",
            self.latitude, self.longitude
        )
    }
}

/// A photo the camera produced.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    /// Where the image was stored. Saved verbatim with the submission.
    pub locator: String,
    /// Encoded image bytes, kept for preview.
    pub image: Vec<u8>,
}

impl std::fmt::Debug for CapturedPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedPhoto")
            .field("locator", &self.locator)
            .field("image_len", &self.image.len())
            .finish()
    }
}

/// The location provider could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location lookup failed: {0}")]
pub struct LocationError(pub String);

/// Takes photos.
#[async_trait::async_trait]
pub trait PhotoCapture: Send + Sync {
    /// Capture a photo into `destination`.
    ///
    /// Resolves to the captured photo, or [`Settled::Cancelled`] if the user
    /// backed out.
    async fn capture(&self, destination: &Path) -> Settled<CapturedPhoto>;
}

/// Reports the device's last known position.
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync {
    /// The last known position, `None` if the platform has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform lookup itself failed.
    async fn last_known(&self) -> Result<Option<Position>, LocationError>;
}

/// Answers whether a capability may be used.
#[async_trait::async_trait]
pub trait PermissionGate: Send + Sync {
    /// Whether `capability` is currently granted.
    fn is_granted(&self, capability: Capability) -> bool;

    /// Ask the user for `capability`. Platforms without a prompt just report
    /// the current state.
    async fn request(&self, capability: Capability) -> bool {
        self.is_granted(capability)
    }
}

/// [`PhotoCapture`] over a launcher that reports back through a callback.
///
/// The launcher receives the destination and a [`Resolver`]; dropping the
/// resolver without resolving counts as a cancelled capture.
pub struct CallbackCamera<F> {
    launch: F,
}

impl<F> CallbackCamera<F>
where
    F: Fn(PathBuf, Resolver<CapturedPhoto>) + Send + Sync,
{
    /// Wrap a camera launcher.
    pub fn new(launch: F) -> Self {
        Self { launch }
    }
}

impl<F> std::fmt::Debug for CallbackCamera<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackCamera").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<F> PhotoCapture for CallbackCamera<F>
where
    F: Fn(PathBuf, Resolver<CapturedPhoto>) + Send + Sync,
{
    async fn capture(&self, destination: &Path) -> Settled<CapturedPhoto> {
        let (resolver, result) = pending();
        (self.launch)(destination.to_path_buf(), resolver);
        result.await
    }
}

/// Answer delivered to a [`CallbackLocation`] resolver.
pub type LocationReply = Result<Option<Position>, LocationError>;

/// [`LocationProvider`] over a callback-style position request.
///
/// A resolver dropped without an answer is reported as a failed lookup.
pub struct CallbackLocation<F> {
    request: F,
}

impl<F> CallbackLocation<F>
where
    F: Fn(Resolver<LocationReply>) + Send + Sync,
{
    /// Wrap a position request.
    pub fn new(request: F) -> Self {
        Self { request }
    }
}

impl<F> std::fmt::Debug for CallbackLocation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackLocation").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<F> LocationProvider for CallbackLocation<F>
where
    F: Fn(Resolver<LocationReply>) + Send + Sync,
{
    async fn last_known(&self) -> Result<Option<Position>, LocationError> {
        let (resolver, result) = pending();
        (self.request)(resolver);
        match result.await {
            Settled::Resolved(reply) => reply,
            Settled::Cancelled => Err(LocationError("no answer from provider".to_string())),
        }
    }
}
