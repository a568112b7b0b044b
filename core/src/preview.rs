//! In-memory preview references for buffered evidence files.
//!
//! A preview is a locally generated reference a rendering layer can resolve
//! to the file's bytes while the file sits in the evidence buffer. The
//! registry owns the referenced bytes; revoking the reference releases them.
//! This mirrors an object-URL lifecycle: create on selection, revoke on
//! delete or start-over.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

/// Registry of live preview references.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<String, Bytes>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bytes and return a fresh preview reference.
    pub fn create(&mut self, bytes: Bytes) -> String {
        let url = format!("blob:intake/{}", Uuid::new_v4());
        self.entries.insert(url.clone(), bytes);
        url
    }

    /// Release a preview reference. Returns false if the reference was
    /// unknown or already revoked.
    pub fn revoke(&mut self, url: &str) -> bool {
        let released = self.entries.remove(url).is_some();
        if !released {
            warn!(url, "revoking unknown preview reference");
        }
        released
    }

    /// Resolve a reference to its bytes, if still live.
    pub fn resolve(&self, url: &str) -> Option<&Bytes> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
