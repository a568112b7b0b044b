//! Per-step page payloads produced by the wizard's page renderers.
//!
//! Each wizard step has one concrete schema; [`PageData`] is the tagged
//! union over all five, keyed by page number. The enum serializes untagged
//! so the wire `page_data` object carries only the page's own fields.
//!
//! Multi-select fields are [`BTreeSet`]s in memory. Serde serializes them as
//! ordered arrays, which is exactly the normalization the backend expects:
//! no native set type ever crosses the serialization boundary.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::wire::StartIntakeRequest;

/// A payload rejected before it reaches the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select how old you were in the images/videos")]
    MissingAgeInContent,
    #[error("select who you are reporting for")]
    EmptyReportingFor,
    #[error("select what kind of content is being reported")]
    EmptySexualContent,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("phone number must be at least 10 digits")]
    InvalidPhone,
    #[error("all required consents must be confirmed before submitting")]
    MissingConsent,
}

/// Page 1: initial disclosure that opens the intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCaseData {
    pub over_18: Option<bool>,
    pub age_in_content: String,
    pub reporting_for: BTreeSet<String>,
    pub sexual_content: BTreeSet<String>,
    pub other_sexual_harm: Option<String>,
}

impl StartCaseData {
    /// Convert into the start-intake wire request, flattening the selection
    /// sets into ordered arrays.
    pub fn start_request(&self) -> StartIntakeRequest {
        StartIntakeRequest {
            over_18: self.over_18,
            age_in_content: self.age_in_content.clone(),
            reporting_for: self.reporting_for.iter().cloned().collect(),
            sexual_content: self.sexual_content.iter().cloned().collect(),
            other_sexual_harm: self.other_sexual_harm.clone(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.age_in_content.is_empty() {
            return Err(ValidationError::MissingAgeInContent);
        }
        if self.reporting_for.is_empty() {
            return Err(ValidationError::EmptyReportingFor);
        }
        if self.sexual_content.is_empty() {
            return Err(ValidationError::EmptySexualContent);
        }
        Ok(())
    }
}

/// Page 2: circumstances of the abuse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatHappenedData {
    pub what_happened: BTreeSet<String>,
    pub knows_who_posted: Option<String>,
    pub who_posted: BTreeSet<String>,
}

/// Which evidence tab the user last worked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceTab {
    #[default]
    Images,
    Urls,
    Text,
}

/// Page 3: evidence summary.
///
/// Raw file contents never appear here; they live in the controller's
/// evidence buffers. This payload carries only counts plus the URL and
/// keyword batches, which is what gets persisted as page data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceData {
    pub evidence_type: EvidenceTab,
    pub remove_files_count: usize,
    pub search_files_count: usize,
    pub text_keywords: Vec<String>,
    pub urls: Vec<String>,
}

/// A country/state/zip triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub state: String,
    pub zip_code: String,
}

/// Optional contact channels. Both fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

impl ContactDetails {
    /// Empty is valid (the field is optional); otherwise the address must
    /// contain both `@` and `.`.
    pub fn email_is_valid(&self) -> bool {
        let email = self.email.trim();
        email.is_empty() || (email.contains('@') && email.contains('.'))
    }

    /// Empty is valid; otherwise at least 10 digits once formatting
    /// characters are stripped.
    pub fn phone_is_valid(&self) -> bool {
        let phone = self.phone.trim();
        phone.is_empty() || normalize_phone(phone).len() >= 10
    }
}

/// Strip everything but digits, keeping the result as a string.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Page 4: survivor location, perpetrator location, and contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfoData {
    pub user_location: Location,
    pub knows_perpetrator_location: Option<String>,
    pub perpetrator_location: Option<Location>,
    pub contact_info: ContactDetails,
    pub notification_preferences: BTreeSet<String>,
    pub identity_preference: Option<String>,
    pub name: Option<String>,
}

impl ContactInfoData {
    /// Normalize before transmission: digits-only phone, perpetrator
    /// location only when the user said they know it, name only when they
    /// chose to provide one.
    pub fn normalized(mut self) -> Self {
        self.contact_info.phone = normalize_phone(&self.contact_info.phone);
        if self.knows_perpetrator_location.as_deref() != Some("yes") {
            self.perpetrator_location = None;
        }
        if self.identity_preference.as_deref() != Some("provideName") {
            self.name = None;
        }
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.contact_info.email_is_valid() {
            return Err(ValidationError::InvalidEmail);
        }
        if !self.contact_info.phone_is_valid() {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}

/// The three permissions required before a case can be submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentFlags {
    pub accurate_info: bool,
    pub hashing_analysis: bool,
    pub takedown_requests: bool,
}

impl ConsentFlags {
    pub fn all_given(self) -> bool {
        self.accurate_info && self.hashing_analysis && self.takedown_requests
    }
}

/// Page 5: consents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentsData {
    pub consents: ConsentFlags,
}

/// The structured payload a single wizard step produces on completion,
/// tagged by page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageData {
    StartCase(StartCaseData),
    WhatHappened(WhatHappenedData),
    Evidence(EvidenceData),
    ContactInfo(ContactInfoData),
    Consents(ConsentsData),
}

impl PageData {
    /// The wizard step this payload belongs to (1-5).
    pub fn page_number(&self) -> u8 {
        match self {
            PageData::StartCase(_) => 1,
            PageData::WhatHappened(_) => 2,
            PageData::Evidence(_) => 3,
            PageData::ContactInfo(_) => 4,
            PageData::Consents(_) => 5,
        }
    }

    /// Apply wire-level normalization where the page defines any.
    pub fn normalized(self) -> Self {
        match self {
            PageData::ContactInfo(data) => PageData::ContactInfo(data.normalized()),
            other => other,
        }
    }

    /// Boundary validation before network transmission. Renderers are
    /// expected to catch these earlier; the controller re-checks so invalid
    /// payloads never reach the network layer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PageData::StartCase(data) => data.validate(),
            PageData::WhatHappened(_) | PageData::Evidence(_) => Ok(()),
            PageData::ContactInfo(data) => data.validate(),
            PageData::Consents(data) => {
                if data.consents.all_given() {
                    Ok(())
                } else {
                    Err(ValidationError::MissingConsent)
                }
            }
        }
    }
}
