//! Mock extraction backend for testing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{BackendError, ExtractedDocument, ExtractionSettings, RosterBackend};

/// A hand-rolled mock implementing [`RosterBackend`] for tests.
///
/// Returns a fixed document (or a fixed open error) for every call and
/// records the path and settings it was called with.
pub struct MockBackend {
    document: Option<ExtractedDocument>,
    error: Option<String>,
    call_count: AtomicUsize,
    last_path: Mutex<Option<PathBuf>>,
    last_settings: Mutex<Option<ExtractionSettings>>,
}

impl MockBackend {
    /// Create a mock that always returns `document`.
    pub fn new(document: ExtractedDocument) -> Self {
        Self {
            document: Some(document),
            error: None,
            call_count: AtomicUsize::new(0),
            last_path: Mutex::new(None),
            last_settings: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with an open error.
    pub fn failing(message: &str) -> Self {
        Self {
            document: None,
            error: Some(message.to_string()),
            call_count: AtomicUsize::new(0),
            last_path: Mutex::new(None),
            last_settings: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().ok().and_then(|p| p.clone())
    }

    pub fn last_settings(&self) -> Option<ExtractionSettings> {
        self.last_settings.lock().ok().and_then(|s| *s)
    }
}

impl RosterBackend for MockBackend {
    fn extract(
        &self,
        path: &Path,
        settings: &ExtractionSettings,
    ) -> Result<ExtractedDocument, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut p) = self.last_path.lock() {
            *p = Some(path.to_path_buf());
        }
        if let Ok(mut s) = self.last_settings.lock() {
            *s = Some(*settings);
        }
        match (&self.document, &self.error) {
            (_, Some(msg)) => Err(BackendError::OpenError(msg.clone())),
            (Some(doc), None) => Ok(doc.clone()),
            (None, None) => Ok(ExtractedDocument::default()),
        }
    }
}
