use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/create-sheet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSheetResponse {
    pub message: String,
    /// Original PDF filename as uploaded.
    pub filename: String,
    pub option: String,
    /// Empty when the top line had fewer than two words.
    pub school_name: String,
    /// The converted roster as CSV; empty when no table rows were found.
    pub csv_data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
