//! The in-progress report record.

use std::collections::BTreeMap;

use intake_protocol::PageData;

use crate::evidence::EvidenceBuffers;

/// Page index constants for the wizard flow.
pub mod page {
    /// The landing page shown before the wizard starts.
    pub const LANDING: u8 = 0;
    /// First wizard step.
    pub const FIRST_STEP: u8 = 1;
    /// Last wizard step (consents / submit).
    pub const LAST_STEP: u8 = 5;
    /// Terminal success page, reached only through a successful submit.
    pub const SUCCESS: u8 = 6;
}

/// Root aggregate of an in-progress report.
///
/// `form_id` is set at most once per draft lifetime, by the first successful
/// start-intake call; only [`IntakeDraft::reset`] clears it. `case_id` and
/// `case_number` are terminal data set by a successful submit.
#[derive(Debug, Default)]
pub struct IntakeDraft {
    pub form_id: Option<String>,
    /// 0 = landing, 1-5 = wizard steps, 6 = success.
    pub current_page: u8,
    /// Last payload saved per page, used to restore fields on back
    /// navigation. Overwritten on each successful "next".
    pub saved_pages: BTreeMap<u8, PageData>,
    /// Raw file buffers, held outside `saved_pages` because file contents
    /// are not serializable into the draft snapshot.
    pub evidence: EvidenceBuffers,
    pub case_id: Option<String>,
    pub case_number: Option<String>,
    /// Last user-visible failure message. Transient UI state.
    pub last_error: Option<String>,
}

impl IntakeDraft {
    /// A fresh draft positioned on the landing page.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_page(&self, page_index: u8) -> Option<&PageData> {
        self.saved_pages.get(&page_index)
    }

    /// Whether the draft has been submitted (terminal state).
    pub fn is_submitted(&self) -> bool {
        self.case_id.is_some()
    }

    /// Clear everything back to step 1. Evidence buffers must be swept by
    /// the caller first so preview references are released.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            current_page: page::FIRST_STEP,
            ..Self::default()
        };
    }
}
