use bytes::Bytes;
use intake_protocol::ActionKind;
use pretty_assertions::assert_eq;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::*;

fn evidence_record(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "intake_form_id": "f1",
        "evidence_type": "image",
        "action_type": "remove",
        "file_path": null,
        "file_name": null,
        "url": null,
        "text_content": null,
        "thumbnail_path": null,
        "created_at": "2025-01-01T00:00:00Z",
    })
}

fn buffer_remove_files(wizard: &mut intake_core::WizardController, names: &[&str]) {
    for name in names {
        wizard.buffer_evidence_file(
            ActionKind::Remove,
            (*name).to_string(),
            "image/png",
            Bytes::from_static(b"\x89PNG"),
        );
    }
}

#[tokio::test]
async fn middle_upload_failure_does_not_stop_the_batch() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;
    // First and third uploads succeed, the second fails. Mount order
    // matters: exhausted mocks are skipped, so the three calls consume
    // these responders in sequence.
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(evidence_record("ev1")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/upload"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(evidence_record("ev3")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut wizard = wizard_with_form(&server).await;
    buffer_remove_files(&mut wizard, &["a.png", "b.png", "c.png"]);

    wizard.advance(what_happened_data()).await.unwrap();
    wizard.advance(evidence_data(vec![], vec![])).await.unwrap();

    // Navigation proceeds regardless of the failed upload.
    assert_eq!(wizard.current_page(), 4);

    let report = wizard.last_upload_report().unwrap();
    assert_eq!(report.records.len(), 2, "uploads 1 and 3 still committed");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].label, "b.png");
    assert!(wizard.draft().last_error.as_deref().unwrap().starts_with("1 evidence item(s)"));

    let uploads = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path().ends_with("/evidence/upload"))
        .count();
    assert_eq!(uploads, 3, "every file was attempted");
}

#[tokio::test]
async fn all_uploads_failing_still_advances() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/upload"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let mut wizard = wizard_with_form(&server).await;
    buffer_remove_files(&mut wizard, &["a.png", "b.png", "c.png"]);

    wizard.advance(what_happened_data()).await.unwrap();
    wizard.advance(evidence_data(vec![], vec![])).await.unwrap();

    assert_eq!(wizard.current_page(), 4);
    let report = wizard.last_upload_report().unwrap();
    assert!(report.records.is_empty());
    assert_eq!(report.failures.len(), 3);
    // Files stay buffered so they can be re-sent later.
    assert_eq!(wizard.draft().evidence.total_files(), 3);
}

#[tokio::test]
async fn both_slots_are_uploaded_with_their_action_kind() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(evidence_record("ev")))
        .expect(2)
        .mount(&server)
        .await;

    let mut wizard = wizard_with_form(&server).await;
    wizard.buffer_evidence_file(
        ActionKind::Remove,
        "takedown.png",
        "image/png",
        Bytes::from_static(b"png"),
    );
    wizard.buffer_evidence_file(
        ActionKind::Search,
        "face.jpg",
        "image/jpeg",
        Bytes::from_static(b"jpg"),
    );

    wizard.advance(what_happened_data()).await.unwrap();
    wizard.advance(evidence_data(vec![], vec![])).await.unwrap();

    let bodies: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path().ends_with("/evidence/upload"))
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect();
    assert_eq!(bodies.len(), 2);
    // Remove slot is drained first, then search.
    assert!(bodies[0].contains("filename=\"takedown.png\""));
    assert!(bodies[0].contains("remove"));
    assert!(bodies[1].contains("filename=\"face.jpg\""));
    assert!(bodies[1].contains("search"));
}

#[tokio::test]
async fn url_and_keyword_batches_are_one_call_each() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/urls"))
        .and(body_json(serde_json::json!({
            "urls": ["https://a.example/1", "https://a.example/2"],
            "action_type": "remove",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/text"))
        .and(body_json(serde_json::json!({
            "keywords": ["leak", "username123"],
            "action_type": "search",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = wizard_with_form(&server).await;
    wizard.advance(what_happened_data()).await.unwrap();
    wizard
        .advance(evidence_data(
            vec![
                "https://a.example/1".to_string(),
                "https://a.example/2".to_string(),
            ],
            vec!["leak".to_string(), "username123".to_string()],
        ))
        .await
        .unwrap();

    assert_eq!(wizard.current_page(), 4);
    assert!(wizard.last_upload_report().unwrap().is_clean());
}

#[tokio::test]
async fn failed_url_batch_does_not_block_navigation() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/intake/f1/evidence/urls"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut wizard = wizard_with_form(&server).await;
    wizard.advance(what_happened_data()).await.unwrap();
    wizard
        .advance(evidence_data(
            vec!["https://a.example/1".to_string()],
            vec![],
        ))
        .await
        .unwrap();

    assert_eq!(wizard.current_page(), 4);
    let report = wizard.last_upload_report().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].label, "url batch");
}

#[tokio::test]
async fn evidence_without_form_id_skips_network_and_keeps_files() {
    let server = MockServer::start().await;

    let mut wizard = wizard_for(&server);
    buffer_remove_files(&mut wizard, &["a.png"]);

    // Start-intake never ran; the evidence step must not try to upload.
    wizard.advance(evidence_data(vec![], vec![])).await.unwrap();

    assert_eq!(wizard.current_page(), 4);
    assert_eq!(wizard.draft().evidence.total_files(), 1, "files retained");
    assert!(
        wizard
            .draft()
            .last_error
            .as_deref()
            .unwrap()
            .contains("not uploaded")
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_buffers_and_batches_make_no_evidence_calls() {
    let server = MockServer::start().await;
    mount_start_ok(&server).await;
    mount_save_ok(&server).await;

    let mut wizard = wizard_with_form(&server).await;
    wizard.advance(what_happened_data()).await.unwrap();
    wizard.advance(evidence_data(vec![], vec![])).await.unwrap();

    let evidence_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path().contains("/evidence/"))
        .count();
    assert_eq!(evidence_calls, 0);
    assert!(wizard.last_upload_report().unwrap().is_clean());
}
