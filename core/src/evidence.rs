//! Evidence file buffers.
//!
//! Raw file contents are not serializable into the draft snapshot, so they
//! live here, keyed by action intent, until the user advances past the
//! evidence step (upload) or starts over (release). Each buffered file is
//! exclusively owned by its slot until explicitly deleted.

use bytes::Bytes;
use intake_protocol::ActionKind;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use crate::preview::PreviewRegistry;

/// A user-selected file held in memory ahead of upload.
#[derive(Debug, Clone)]
pub struct BufferedFile {
    /// Unique per selection event. Selecting the same file twice produces
    /// two entries with distinct ids; nothing is deduplicated.
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    /// Live preview reference, present for image and video files.
    pub preview_url: Option<String>,
}

impl BufferedFile {
    fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
        previews: &mut PreviewRegistry,
    ) -> Self {
        let content_type = content_type.into();
        let preview_url = (content_type.starts_with("image/")
            || content_type.starts_with("video/"))
        .then(|| previews.create(bytes.clone()));
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            content_type,
            bytes,
            preview_url,
        }
    }
}

/// The two evidence buffers, one per action intent.
#[derive(Debug, Clone, Default)]
pub struct EvidenceBuffers {
    pub remove_files: Vec<BufferedFile>,
    pub search_files: Vec<BufferedFile>,
}

impl EvidenceBuffers {
    pub fn files(&self, kind: ActionKind) -> &[BufferedFile] {
        match kind {
            ActionKind::Remove => &self.remove_files,
            ActionKind::Search => &self.search_files,
        }
    }

    fn files_mut(&mut self, kind: ActionKind) -> &mut Vec<BufferedFile> {
        match kind {
            ActionKind::Remove => &mut self.remove_files,
            ActionKind::Search => &mut self.search_files,
        }
    }

    /// Buffer a newly selected file, creating a preview reference for
    /// image/video content. Returns the fresh file id.
    pub fn buffer(
        &mut self,
        kind: ActionKind,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
        previews: &mut PreviewRegistry,
    ) -> String {
        let file = BufferedFile::new(file_name, content_type, bytes, previews);
        debug!(%kind, id = %file.id, file_name = %file.file_name, "buffered evidence file");
        let id = file.id.clone();
        self.files_mut(kind).push(file);
        id
    }

    /// Delete a buffered file by id, revoking its preview reference.
    /// Returns false if no file with that id exists in the slot.
    pub fn delete(&mut self, kind: ActionKind, id: &str, previews: &mut PreviewRegistry) -> bool {
        let files = self.files_mut(kind);
        let Some(index) = files.iter().position(|file| file.id == id) else {
            return false;
        };
        let file = files.remove(index);
        if let Some(url) = &file.preview_url {
            previews.revoke(url);
        }
        true
    }

    /// Release every buffered file and its preview. Best-effort sweep: a
    /// failed revoke is logged and the sweep continues.
    pub fn clear(&mut self, previews: &mut PreviewRegistry) {
        for file in self.remove_files.drain(..).chain(self.search_files.drain(..)) {
            if let Some(url) = &file.preview_url {
                if !previews.revoke(url) {
                    warn!(id = %file.id, "preview already released for buffered file");
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remove_files.is_empty() && self.search_files.is_empty()
    }

    pub fn total_files(&self) -> usize {
        self.remove_files.len() + self.search_files.len()
    }
}
