mod evidence;

use std::collections::BTreeSet;

use intake_backend_client::IntakeClient;
use intake_core::WizardController;
use intake_protocol::ConsentFlags;
use intake_protocol::ConsentsData;
use intake_protocol::ContactDetails;
use intake_protocol::ContactInfoData;
use intake_protocol::EvidenceData;
use intake_protocol::Location;
use intake_protocol::PageData;
use intake_protocol::StartCaseData;
use intake_protocol::WhatHappenedData;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::path_regex;

/// A wizard wired to the mock backend, already past the landing page.
pub fn wizard_for(server: &MockServer) -> WizardController {
    let mut wizard = WizardController::with_client(IntakeClient::new(server.uri()));
    wizard.start();
    wizard
}

pub fn form_response() -> serde_json::Value {
    serde_json::json!({
        "id": "f1",
        "survivor_id": "s1",
        "form_status": "draft",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
    })
}

pub fn start_case_data() -> PageData {
    PageData::StartCase(StartCaseData {
        over_18: Some(true),
        age_in_content: "over18".to_string(),
        reporting_for: BTreeSet::from(["myself".to_string()]),
        sexual_content: BTreeSet::from(["nude".to_string()]),
        other_sexual_harm: None,
    })
}

pub fn what_happened_data() -> PageData {
    PageData::WhatHappened(WhatHappenedData {
        what_happened: BTreeSet::from(["postedWithoutConsent".to_string()]),
        knows_who_posted: Some("yes".to_string()),
        who_posted: BTreeSet::from(["expartner".to_string()]),
    })
}

pub fn evidence_data(urls: Vec<String>, keywords: Vec<String>) -> PageData {
    PageData::Evidence(EvidenceData {
        text_keywords: keywords,
        urls,
        ..Default::default()
    })
}

pub fn contact_info_data() -> PageData {
    PageData::ContactInfo(ContactInfoData {
        user_location: Location {
            country: "United States".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
        },
        contact_info: ContactDetails {
            email: "survivor@example.org".to_string(),
            phone: "(555) 123-4567".to_string(),
        },
        ..Default::default()
    })
}

pub fn consents_data() -> PageData {
    PageData::Consents(ConsentsData {
        consents: ConsentFlags {
            accurate_info: true,
            hashing_analysis: true,
            takedown_requests: true,
        },
    })
}

/// Mount a successful start-intake responder for form `f1`.
pub async fn mount_start_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/intake/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_response()))
        .mount(server)
        .await;
}

/// Mount a successful save-page responder for every page of form `f1`.
pub async fn mount_save_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/intake/f1/page/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(form_response()))
        .mount(server)
        .await;
}

/// Drive a wizard through page 1 so `form_id` is known. The caller must
/// have mounted a start-intake responder.
pub async fn wizard_with_form(server: &MockServer) -> WizardController {
    let mut wizard = wizard_for(server);
    wizard.advance(start_case_data()).await.unwrap();
    assert_eq!(wizard.draft().form_id.as_deref(), Some("f1"));
    wizard
}
