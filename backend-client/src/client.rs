//! The intake backend HTTP client.

use bytes::Bytes;
use intake_protocol::ActionKind;
use intake_protocol::EvidenceResponse;
use intake_protocol::IntakeFormResponse;
use intake_protocol::SavePageRequest;
use intake_protocol::StartIntakeRequest;
use intake_protocol::SubmitIntakeResponse;
use intake_protocol::TextEvidenceRequest;
use intake_protocol::UrlEvidenceRequest;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Error body shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

/// Client for the intake backend REST API.
///
/// Cheap to clone; holds a shared [`reqwest::Client`] connection pool.
#[derive(Debug, Clone)]
pub struct IntakeClient {
    base_url: String,
    client: reqwest::Client,
}

impl IntakeClient {
    /// Production backend, used when no override is configured.
    pub const DEFAULT_BASE_URL: &'static str =
        "https://nc-aa1a0762ed8b46afb47bd598909d279e.ecs.us-west-2.on.aws";

    /// Environment variable that overrides the backend base URL.
    pub const BASE_URL_ENV: &'static str = "INTAKE_API_BASE_URL";

    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a caller-supplied [`reqwest::Client`], e.g. one
    /// configured with custom timeouts.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    /// Create a client from `INTAKE_API_BASE_URL`, falling back to the
    /// production backend.
    pub fn from_env() -> Self {
        let base_url = std::env::var(Self::BASE_URL_ENV)
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a new intake form from the page-1 disclosure.
    pub async fn start_intake(
        &self,
        request: &StartIntakeRequest,
    ) -> Result<IntakeFormResponse, ApiError> {
        debug!("POST /api/intake/start");
        let response = self
            .client
            .post(self.url("/api/intake/start"))
            .json(request)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Save one page's data. Repeated calls with the same `page_number`
    /// overwrite the previously saved data for that page.
    pub async fn save_page<T: Serialize>(
        &self,
        form_id: &str,
        page_number: u8,
        page_data: &T,
    ) -> Result<IntakeFormResponse, ApiError> {
        debug!(form_id, page_number, "POST /api/intake/{{id}}/page/{{n}}");
        let response = self
            .client
            .post(self.url(&format!("/api/intake/{form_id}/page/{page_number}")))
            .json(&SavePageRequest {
                page_number,
                page_data,
            })
            .send()
            .await?;
        handle_response(response).await
    }

    /// Fetch the current snapshot of an intake form. Not used on the happy
    /// path; kept for recovery and debugging.
    pub async fn get_intake_form(&self, form_id: &str) -> Result<IntakeFormResponse, ApiError> {
        debug!(form_id, "GET /api/intake/{{id}}");
        let response = self
            .client
            .get(self.url(&format!("/api/intake/{form_id}")))
            .send()
            .await?;
        handle_response(response).await
    }

    /// Submit the completed form. Terminal: once this succeeds the form is
    /// immutable from the wizard's perspective.
    pub async fn submit_intake(&self, form_id: &str) -> Result<SubmitIntakeResponse, ApiError> {
        debug!(form_id, "POST /api/intake/{{id}}/submit");
        let response = self
            .client
            .post(self.url(&format!("/api/intake/{form_id}/submit")))
            .send()
            .await?;
        handle_response(response).await
    }

    /// Upload a single evidence file as multipart form data.
    pub async fn upload_evidence_file(
        &self,
        form_id: &str,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
        action_kind: ActionKind,
    ) -> Result<EvidenceResponse, ApiError> {
        debug!(
            form_id,
            file_name,
            %action_kind,
            "POST /api/intake/{{id}}/evidence/upload"
        );
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("action_type", action_kind.as_str());
        let response = self
            .client
            .post(self.url(&format!("/api/intake/{form_id}/evidence/upload")))
            .multipart(form)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Create evidence records for a batch of URLs in a single call.
    pub async fn create_url_evidence(
        &self,
        form_id: &str,
        urls: &[String],
        action_kind: ActionKind,
    ) -> Result<Vec<EvidenceResponse>, ApiError> {
        debug!(form_id, count = urls.len(), "POST /api/intake/{{id}}/evidence/urls");
        let response = self
            .client
            .post(self.url(&format!("/api/intake/{form_id}/evidence/urls")))
            .json(&UrlEvidenceRequest {
                urls,
                action_type: action_kind,
            })
            .send()
            .await?;
        handle_response(response).await
    }

    /// Create evidence records for a batch of search keywords in a single
    /// call.
    pub async fn create_text_evidence(
        &self,
        form_id: &str,
        keywords: &[String],
        action_kind: ActionKind,
    ) -> Result<Vec<EvidenceResponse>, ApiError> {
        debug!(
            form_id,
            count = keywords.len(),
            "POST /api/intake/{{id}}/evidence/text"
        );
        let response = self
            .client
            .post(self.url(&format!("/api/intake/{form_id}/evidence/text")))
            .json(&TextEvidenceRequest {
                keywords,
                action_type: action_kind,
            })
            .send()
            .await?;
        handle_response(response).await
    }
}

/// Normalize a response into a typed payload or an [`ApiError`].
///
/// Non-2xx: the body is parsed for a JSON `detail` (or `message`) field,
/// falling back to the HTTP status reason when the body is not JSON or
/// carries neither field. 2xx with a non-JSON content type is treated as an
/// empty success payload, not an error.
async fn handle_response<T: DeserializeOwned + Default>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let fallback = status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail.or(body.message),
            Err(_) => None,
        };
        let message = detail.clone().unwrap_or(fallback);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
            detail,
        });
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if !is_json {
        return Ok(T::default());
    }

    Ok(response.json::<T>().await?)
}
