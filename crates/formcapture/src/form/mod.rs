//! Form capture: the controller and the platform capabilities it drives.
//!
//! The controller keeps the typed fields, the last photo and location fix,
//! and the list of stored submissions. Camera, location and permissions are
//! reached through the [`PhotoCapture`], [`LocationProvider`] and
//! [`PermissionGate`] traits, so the same controller
//! runs against a phone's platform glue, the desktop host in
//! [`crate::desktop`], or test fakes.

mod collaborators;
mod controller;

pub use collaborators::{
    CallbackCamera, CallbackLocation, Capability, CapturedPhoto, LocationError, LocationProvider,
    LocationReply, PermissionGate, PhotoCapture, Position,
};
pub use controller::{FormController, FormFields, Notice, SubmitOutcome};
