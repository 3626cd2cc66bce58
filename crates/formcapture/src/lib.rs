//! `formcapture` - capture form submissions on the device
//!
//! This library stores form submissions (name, email, comment and the
//! locator of a captured photo) in a local `SQLite` file, and provides the
//! controller that fills the form using camera, location and permission
//! capabilities supplied by the host platform.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod desktop;
pub mod error;
pub mod form;
pub mod logging;
pub mod pending;
pub mod photo;
pub mod storage;
pub mod submission;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormController, Notice, SubmitOutcome};
pub use logging::init_logging;
pub use storage::{SchemaAction, SubmissionStore};
pub use submission::{NewSubmission, Submission};
