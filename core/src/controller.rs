//! The multi-page wizard controller.
//!
//! Single source of truth for navigation, draft persistence, and
//! loading/error state. Page renderers call [`WizardController::advance`]
//! and [`WizardController::submit`] with the payload their step produced;
//! the controller persists the payload locally before any network attempt,
//! performs the required backend call, and only moves the page index forward
//! on success. Network failures leave the user on the same page with their
//! input intact, so retry is a plain re-click.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use bytes::Bytes;
use intake_backend_client::ApiError;
use intake_backend_client::IntakeClient;
use intake_protocol::ActionKind;
use intake_protocol::PageData;
use intake_protocol::ValidationError;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::IntakeConfig;
use crate::draft::IntakeDraft;
use crate::draft::page;
use crate::preview::PreviewRegistry;
use crate::uploader::EvidenceUploader;
use crate::uploader::UploadReport;

/// Failure of a controller operation.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The payload failed boundary validation; nothing was transmitted.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A backend call failed. Recoverable: the page payload is already
    /// saved locally and the user may retry.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A call arrived while another request was outstanding. The second
    /// call is rejected, never interleaved.
    #[error("a request is already in flight")]
    Busy,

    /// Submit was invoked before an intake form exists. This is a
    /// control-flow bug in the rendering layer, not a user-recoverable
    /// condition.
    #[error("submit called without an intake form id")]
    MissingFormId,
}

impl ControllerError {
    /// Single displayable string per failure.
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Marks a request outstanding for the lifetime of the guard.
///
/// The flag is cleared in `Drop`, so an `advance`/`submit` future dropped at
/// an await point (timeout, discarded UI event) releases it instead of
/// leaving the controller stuck in the busy state.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the [`IntakeDraft`] and mediates every page transition through the
/// backend client.
pub struct WizardController {
    client: IntakeClient,
    draft: IntakeDraft,
    previews: PreviewRegistry,
    in_flight: Arc<AtomicBool>,
    last_upload_report: Option<UploadReport>,
}

impl WizardController {
    pub fn new(config: IntakeConfig) -> Self {
        Self::with_client(IntakeClient::new(config.base_url))
    }

    pub fn with_client(client: IntakeClient) -> Self {
        Self {
            client,
            draft: IntakeDraft::new(),
            previews: PreviewRegistry::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
            last_upload_report: None,
        }
    }

    pub fn draft(&self) -> &IntakeDraft {
        &self.draft
    }

    pub fn current_page(&self) -> u8 {
        self.draft.current_page
    }

    /// True while an [`WizardController::advance`] or
    /// [`WizardController::submit`] call is outstanding. UI state for
    /// disabling the navigation buttons.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn saved_page(&self, page_index: u8) -> Option<&PageData> {
        self.draft.saved_page(page_index)
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Outcome of the evidence pass from the most recent advance past the
    /// evidence step, if one ran.
    pub fn last_upload_report(&self) -> Option<&UploadReport> {
        self.last_upload_report.as_ref()
    }

    /// Leave the landing page for step 1. No network, always succeeds.
    pub fn start(&mut self) {
        if self.draft.current_page == page::LANDING {
            self.draft.current_page = page::FIRST_STEP;
        }
    }

    /// Step back one page; from step 1 back to the landing page. No
    /// network, never fails, a no-op on the landing page.
    pub fn go_back(&mut self) {
        match self.draft.current_page {
            page::LANDING => {}
            page::FIRST_STEP => self.draft.current_page = page::LANDING,
            _ => self.draft.current_page -= 1,
        }
    }

    /// Buffer a newly selected evidence file for the given action intent.
    /// Every selection event creates a fresh entry; duplicates are kept.
    pub fn buffer_evidence_file(
        &mut self,
        kind: ActionKind,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> String {
        self.draft
            .evidence
            .buffer(kind, file_name, content_type, bytes, &mut self.previews)
    }

    /// Delete a buffered evidence file, releasing its preview reference.
    pub fn delete_evidence_file(&mut self, kind: ActionKind, id: &str) -> bool {
        self.draft.evidence.delete(kind, id, &mut self.previews)
    }

    /// Save the page payload and move forward one page.
    ///
    /// The payload is stored into the draft before the network attempt, so
    /// a failed save loses no user input. Page 1 without a form id performs
    /// the start-intake call that creates the remote record; every other
    /// page with a known form id is saved via save-page. The evidence page
    /// additionally runs the upload orchestrator after a successful save;
    /// upload failures are surfaced in aggregate but never block
    /// navigation.
    pub async fn advance(&mut self, data: PageData) -> Result<(), ControllerError> {
        let Some(_in_flight) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("advance rejected: request already in flight");
            return Err(ControllerError::Busy);
        };

        let data = data.normalized();
        let page_index = data.page_number();
        // Stored unconditionally, even if validation or the network call
        // fails, so the user's input survives a retry.
        self.draft.saved_pages.insert(page_index, data.clone());

        if let Err(err) = data.validate() {
            self.draft.last_error = Some(err.to_string());
            return Err(err.into());
        }

        self.draft.last_error = None;
        let result = self.advance_network_step(page_index, &data).await;

        match result {
            Ok(report) => {
                if let Some(report) = &report {
                    self.draft.last_error = report.failure_summary();
                }
                self.last_upload_report = report;
                self.draft.current_page = page_index + 1;
                debug!(page = self.draft.current_page, "advanced");
                Ok(())
            }
            Err(err) => {
                self.draft.last_error = Some(err.user_message());
                Err(ControllerError::Api(err))
            }
        }
    }

    /// The single required network step for an advance, if any.
    async fn advance_network_step(
        &mut self,
        page_index: u8,
        data: &PageData,
    ) -> Result<Option<UploadReport>, ApiError> {
        let Some(form_id) = self.draft.form_id.clone() else {
            if let PageData::StartCase(start) = data {
                let response = self.client.start_intake(&start.start_request()).await?;
                info!(form_id = %response.id, "intake form created");
                self.draft.form_id = Some(response.id);
            } else if matches!(data, PageData::Evidence(_)) {
                // Start-intake never succeeded; nothing can be persisted.
                // Files stay buffered in memory for a later attempt.
                warn!("no intake form yet; evidence not persisted");
                self.draft.last_error =
                    Some("evidence was kept locally but not uploaded yet".to_string());
            }
            return Ok(None);
        };

        self.client.save_page(&form_id, page_index, data).await?;

        if let PageData::Evidence(evidence) = data {
            let report = EvidenceUploader::new(&self.client)
                .upload_all(&form_id, &self.draft.evidence, evidence)
                .await;
            return Ok(Some(report));
        }
        Ok(None)
    }

    /// Terminal transition from the last step: save the final payload if
    /// present, submit the form, and record the case identifiers.
    pub async fn submit(&mut self, data: Option<PageData>) -> Result<(), ControllerError> {
        let Some(_in_flight) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("submit rejected: request already in flight");
            return Err(ControllerError::Busy);
        };
        // A missing form id here is an internal-consistency bug; fail
        // before any network traffic.
        let Some(form_id) = self.draft.form_id.clone() else {
            warn!("submit called without a form id");
            return Err(ControllerError::MissingFormId);
        };

        let data = match data {
            Some(data) => {
                let data = data.normalized();
                self.draft.saved_pages.insert(data.page_number(), data.clone());
                data.validate()?;
                Some(data)
            }
            None => None,
        };

        self.draft.last_error = None;
        let result = self.submit_network_steps(&form_id, data.as_ref()).await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.draft.last_error = Some(err.user_message());
                Err(ControllerError::Api(err))
            }
        }
    }

    async fn submit_network_steps(
        &mut self,
        form_id: &str,
        data: Option<&PageData>,
    ) -> Result<(), ApiError> {
        if let Some(data) = data {
            self.client
                .save_page(form_id, data.page_number(), data)
                .await?;
        }
        let response = self.client.submit_intake(form_id).await?;
        info!(
            case_id = %response.case_id,
            case_number = %response.case_number,
            "intake submitted"
        );
        self.draft.case_id = Some(response.case_id);
        self.draft.case_number = Some(response.case_number);
        self.draft.current_page = page::SUCCESS;
        Ok(())
    }

    /// Full reset of the in-progress draft back to step 1. Releases every
    /// buffered file's preview reference; the sweep is best-effort and
    /// continues past individual release failures.
    pub fn start_over(&mut self) {
        info!("starting over");
        self.draft.evidence.clear(&mut self.previews);
        self.draft.reset();
        self.last_upload_report = None;
    }
}
