//! Desktop implementations of the form's platform capabilities.
//!
//! There is no camera or GPS on a workstation, so the `formcap` binary uses
//! these stand-ins: a "camera" that copies an existing image file into the
//! photo directory, a fixed position from configuration, and a permission
//! gate that answers from configuration.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PermissionsConfig;
use crate::form::{
    Capability, CapturedPhoto, LocationError, LocationProvider, PermissionGate, PhotoCapture,
    Position,
};
use crate::pending::Settled;

/// Captures a photo by copying an existing image file.
///
/// With no source configured, every capture is cancelled.
#[derive(Debug, Clone, Default)]
pub struct FilePhotoCapture {
    source: Option<PathBuf>,
}

impl FilePhotoCapture {
    /// Copy from `source` on every capture.
    #[must_use]
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }
}

#[async_trait::async_trait]
impl PhotoCapture for FilePhotoCapture {
    async fn capture(&self, destination: &Path) -> Settled<CapturedPhoto> {
        let Some(source) = &self.source else {
            debug!("No photo source given, capture cancelled");
            return Settled::Cancelled;
        };

        let image = match tokio::fs::read(source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read photo {}: {}", source.display(), e);
                return Settled::Cancelled;
            }
        };
        if let Err(e) = tokio::fs::write(destination, &image).await {
            warn!("Cannot write photo {}: {}", destination.display(), e);
            return Settled::Cancelled;
        }

        Settled::Resolved(CapturedPhoto {
            locator: destination.display().to_string(),
            image,
        })
    }
}

/// Always reports the same position, or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Position>);

#[async_trait::async_trait]
impl LocationProvider for FixedLocation {
    async fn last_known(&self) -> Result<Option<Position>, LocationError> {
        Ok(self.0)
    }
}

/// Grants capabilities according to configuration. There is no prompt.
#[derive(Debug, Clone)]
pub struct StaticPermissions(pub PermissionsConfig);

#[async_trait::async_trait]
impl PermissionGate for StaticPermissions {
    fn is_granted(&self, capability: Capability) -> bool {
        self.0.allows(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_capture_copies_image() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.jpg");
        std::fs::write(&source, b"\xFF\xD8fake jpeg").unwrap();
        let destination = dir.path().join("JPEG_20240115_103005.jpg");

        let camera = FilePhotoCapture::new(Some(source));
        let photo = camera.capture(&destination).await.into_option().unwrap();

        assert_eq!(photo.locator, destination.display().to_string());
        assert_eq!(photo.image, b"\xFF\xD8fake jpeg");
        assert_eq!(std::fs::read(&destination).unwrap(), photo.image);
    }

    #[tokio::test]
    async fn test_file_capture_without_source_cancels() {
        let dir = TempDir::new().unwrap();
        let camera = FilePhotoCapture::default();

        let result = camera.capture(&dir.path().join("x.jpg")).await;
        assert_eq!(result, Settled::Cancelled);
    }

    #[tokio::test]
    async fn test_file_capture_missing_source_cancels() {
        let dir = TempDir::new().unwrap();
        let camera = FilePhotoCapture::new(Some(dir.path().join("missing.jpg")));
        let destination = dir.path().join("x.jpg");

        assert_eq!(camera.capture(&destination).await, Settled::Cancelled);
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let pos = Position {
            latitude: 10.0,
            longitude: 20.0,
        };
        assert_eq!(FixedLocation(Some(pos)).last_known().await, Ok(Some(pos)));
        assert_eq!(FixedLocation(None).last_known().await, Ok(None));
    }

    #[tokio::test]
    async fn test_static_permissions() {
        let gate = StaticPermissions(PermissionsConfig {
            camera: true,
            location: false,
        });
        assert!(gate.is_granted(Capability::Camera));
        assert!(!gate.request(Capability::Location).await);
    }
}
