use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ExtractedDocument;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract content: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Proximity tolerances handed to the PDF backend, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Horizontal gap within which characters belong to the same word.
    pub x_tolerance: f64,
    /// Vertical distance within which characters and words share a line.
    pub y_tolerance: f64,
    /// Distance within which parallel ruling lines are snapped together.
    pub snap_tolerance: f64,
    /// Gap within which collinear ruling segments are joined.
    pub join_tolerance: f64,
    /// Only drawn lines count as table rulings; rectangle edges are ignored.
    pub strict_lines: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            x_tolerance: 2.0,
            y_tolerance: 2.0,
            snap_tolerance: 5.0,
            join_tolerance: 5.0,
            strict_lines: true,
        }
    }
}

/// Trait for PDF extraction backends.
///
/// Implementors open the PDF, return the text of the first page and every
/// ruled table found on every page. Flattening and column mapping live in
/// [`crate::convert`].
pub trait RosterBackend: Send + Sync {
    fn extract(
        &self,
        path: &Path,
        settings: &ExtractionSettings,
    ) -> Result<ExtractedDocument, BackendError>;
}
