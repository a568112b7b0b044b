//! Core of the intake wizard: navigation, draft persistence, and evidence
//! upload orchestration.
//!
//! The [`WizardController`] is the single source of truth for an in-progress
//! report. Page renderers hand it a [`intake_protocol::PageData`] on every
//! "Next"/"Submit" and read draft state back for display; the controller
//! mediates every page transition through the
//! [`intake_backend_client::IntakeClient`].

pub mod config;
pub mod controller;
pub mod draft;
pub mod evidence;
pub mod preview;
pub mod uploader;

pub use config::IntakeConfig;
pub use controller::ControllerError;
pub use controller::WizardController;
pub use draft::IntakeDraft;
pub use draft::page;
pub use evidence::BufferedFile;
pub use evidence::EvidenceBuffers;
pub use preview::PreviewRegistry;
pub use uploader::EvidenceUploader;
pub use uploader::UploadFailure;
pub use uploader::UploadReport;
