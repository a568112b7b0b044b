//! Data contracts for the intake wizard.
//!
//! This crate holds the per-step page payloads ([`PageData`]) and the wire
//! request/response types exchanged with the intake backend. It is pure
//! data: no I/O, no state. The [`wire`] shapes mirror the backend REST API
//! field-for-field; the [`pages`] shapes are what page renderers produce and
//! what the wizard controller persists between navigation steps.

pub mod pages;
pub mod wire;

pub use pages::ConsentFlags;
pub use pages::ConsentsData;
pub use pages::ContactDetails;
pub use pages::ContactInfoData;
pub use pages::EvidenceData;
pub use pages::EvidenceTab;
pub use pages::Location;
pub use pages::PageData;
pub use pages::StartCaseData;
pub use pages::ValidationError;
pub use pages::WhatHappenedData;
pub use wire::ActionKind;
pub use wire::EvidenceResponse;
pub use wire::IntakeFormResponse;
pub use wire::SavePageRequest;
pub use wire::StartIntakeRequest;
pub use wire::SubmitIntakeResponse;
pub use wire::TextEvidenceRequest;
pub use wire::UrlEvidenceRequest;
