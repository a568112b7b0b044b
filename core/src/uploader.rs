//! Evidence upload orchestration.
//!
//! Turns the evidence page's locally buffered files, URLs, and keywords into
//! committed backend records when the user advances past the evidence step.
//! Individual failures are recorded and skipped, never fatal: a partially
//! failed batch must not block the survivor from completing intake.

use intake_backend_client::ApiError;
use intake_backend_client::IntakeClient;
use intake_protocol::ActionKind;
use intake_protocol::EvidenceData;
use intake_protocol::EvidenceResponse;
use tracing::info;
use tracing::warn;

use crate::evidence::EvidenceBuffers;

/// One evidence item that failed to commit.
#[derive(Debug)]
pub struct UploadFailure {
    /// What was being uploaded, e.g. a file name or `"url batch"`.
    pub label: String,
    pub error: ApiError,
}

/// Aggregate outcome of one pass over the evidence page's items.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub records: Vec<EvidenceResponse>,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregate user-facing notice, present only when something failed.
    pub fn failure_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(format!(
            "{} evidence item(s) could not be uploaded; you can continue and add them again later",
            self.failures.len()
        ))
    }
}

/// Sequences the per-file and per-batch evidence calls.
pub struct EvidenceUploader<'a> {
    client: &'a IntakeClient,
}

impl<'a> EvidenceUploader<'a> {
    pub fn new(client: &'a IntakeClient) -> Self {
        Self { client }
    }

    /// Upload every buffered file and both batches for a known form.
    ///
    /// Files are uploaded one at a time, "remove" slot first, each awaited
    /// before the next so per-file failure attribution stays unambiguous.
    /// URL and keyword batches are one call each. Failures are collected
    /// into the report and the pass always runs to completion.
    pub async fn upload_all(
        &self,
        form_id: &str,
        buffers: &EvidenceBuffers,
        page: &EvidenceData,
    ) -> UploadReport {
        let mut report = UploadReport::default();

        for kind in [ActionKind::Remove, ActionKind::Search] {
            for file in buffers.files(kind) {
                let outcome = self
                    .client
                    .upload_evidence_file(
                        form_id,
                        &file.file_name,
                        &file.content_type,
                        file.bytes.clone(),
                        kind,
                    )
                    .await;
                match outcome {
                    Ok(record) => report.records.push(record),
                    Err(error) => {
                        warn!(%kind, file_name = %file.file_name, %error, "evidence file upload failed");
                        report.failures.push(UploadFailure {
                            label: file.file_name.clone(),
                            error,
                        });
                    }
                }
            }
        }

        if !page.urls.is_empty() {
            match self
                .client
                .create_url_evidence(form_id, &page.urls, ActionKind::Remove)
                .await
            {
                Ok(records) => report.records.extend(records),
                Err(error) => {
                    warn!(count = page.urls.len(), %error, "url evidence batch failed");
                    report.failures.push(UploadFailure {
                        label: "url batch".to_string(),
                        error,
                    });
                }
            }
        }

        if !page.text_keywords.is_empty() {
            match self
                .client
                .create_text_evidence(form_id, &page.text_keywords, ActionKind::Search)
                .await
            {
                Ok(records) => report.records.extend(records),
                Err(error) => {
                    warn!(count = page.text_keywords.len(), %error, "keyword evidence batch failed");
                    report.failures.push(UploadFailure {
                        label: "keyword batch".to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            form_id,
            committed = report.records.len(),
            failed = report.failures.len(),
            "evidence upload pass finished"
        );
        report
    }
}
