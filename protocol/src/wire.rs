//! Request and response bodies for the intake backend REST API.
//!
//! Field names match the backend's snake_case JSON exactly. Response types
//! derive [`Default`] so that a 2xx response with a non-JSON body can decay
//! to an empty payload instead of a deserialization error.

use serde::Deserialize;
use serde::Serialize;

/// Intent attached to a piece of evidence: take down known content, or
/// proactively search for matching content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Remove,
    Search,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Remove => "remove",
            ActionKind::Search => "search",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/intake/start`, derived from the page-1 disclosure.
///
/// Set-valued selections are already normalized to ordered arrays here; no
/// native set type crosses the network boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartIntakeRequest {
    pub over_18: Option<bool>,
    pub age_in_content: String,
    pub reporting_for: Vec<String>,
    pub sexual_content: Vec<String>,
    pub other_sexual_harm: Option<String>,
}

/// Body of `POST /api/intake/{form_id}/page/{page_number}`.
///
/// `page_data` is opaque to the transport; the caller supplies any
/// serializable payload.
#[derive(Debug, Clone, Serialize)]
pub struct SavePageRequest<T> {
    pub page_number: u8,
    pub page_data: T,
}

/// Body of `POST /api/intake/{form_id}/evidence/urls`.
#[derive(Debug, Clone, Serialize)]
pub struct UrlEvidenceRequest<'a> {
    pub urls: &'a [String],
    pub action_type: ActionKind,
}

/// Body of `POST /api/intake/{form_id}/evidence/text`.
#[derive(Debug, Clone, Serialize)]
pub struct TextEvidenceRequest<'a> {
    pub keywords: &'a [String],
    pub action_type: ActionKind,
}

/// Snapshot of an intake form record, returned by start/save/get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeFormResponse {
    pub id: String,
    pub survivor_id: String,
    pub form_status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Terminal response of `POST /api/intake/{form_id}/submit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitIntakeResponse {
    pub case_id: String,
    pub case_number: String,
    pub survivor_id: String,
}

/// A committed evidence record (file, URL, or keyword batch entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceResponse {
    pub id: String,
    pub intake_form_id: String,
    pub evidence_type: String,
    pub action_type: String,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub url: Option<String>,
    pub text_content: Option<String>,
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub created_at: String,
}
