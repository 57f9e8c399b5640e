use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

// Re-export domain types for convenience
pub use roster_core::{
    Conversion, ConvertError, ConvertSettings, ExtractedDocument, MappedTable, MappingWarning,
    RosterBackend,
};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of roster-ingest)")]
    NoPdfSupport,
}

/// The backend used when no other is injected.
#[cfg(feature = "pdf")]
pub fn default_backend() -> Result<Arc<dyn RosterBackend>, IngestError> {
    Ok(Arc::new(roster_pdf::PdfplumberBackend::default()))
}

#[cfg(not(feature = "pdf"))]
pub fn default_backend() -> Result<Arc<dyn RosterBackend>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Convert a roster PDF on disk with the default backend.
pub fn convert_file(
    path: &Path,
    option: &str,
    settings: &ConvertSettings,
) -> Result<Conversion, IngestError> {
    let backend = default_backend()?;
    Ok(roster_core::convert_path(path, option, backend.as_ref(), settings)?)
}

/// Extract a roster PDF on disk without mapping it.
pub fn extract_file(
    path: &Path,
    settings: &ConvertSettings,
) -> Result<ExtractedDocument, IngestError> {
    let backend = default_backend()?;
    backend
        .extract(path, &settings.extraction)
        .map_err(|e| IngestError::Convert(e.into()))
}

/// Convert uploaded PDF bytes.
///
/// The bytes are staged in a temporary `.pdf` file inside `staging_dir`,
/// which is removed again before this returns, whatever the outcome.
pub fn convert_bytes(
    data: &[u8],
    staging_dir: &Path,
    option: &str,
    backend: &dyn RosterBackend,
    settings: &ConvertSettings,
) -> Result<Conversion, IngestError> {
    std::fs::create_dir_all(staging_dir).map_err(IngestError::Staging)?;
    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile_in(staging_dir)
        .map_err(IngestError::Staging)?;
    staged.write_all(data).map_err(IngestError::Staging)?;
    staged.flush().map_err(IngestError::Staging)?;
    tracing::debug!(path = %staged.path().display(), bytes = data.len(), "staged upload");

    let conversion = roster_core::convert_path(staged.path(), option, backend, settings)?;
    Ok(conversion)
}
