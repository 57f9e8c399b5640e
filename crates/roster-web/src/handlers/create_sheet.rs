use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use roster_core::Conversion;
use roster_reporting::{ExportFormat, export_csv, output_filename, save_export};

use crate::error::ApiError;
use crate::models::CreateSheetResponse;
use crate::state::AppState;
use crate::upload::{self, UploadedFile};

const SAVED_MESSAGE: &str =
    "PDF processed. Extracted text and table data. Processed CSV file saved on server.";
const NO_TABLE_MESSAGE: &str = "PDF processed. No table rows found; nothing was saved.";
const SAVE_FAILED_MESSAGE: &str =
    "PDF processed. Extracted text and table data. Processed CSV file could not be saved on server.";

/// What happened to the converted table on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveOutcome {
    Saved,
    NoTable,
    Failed,
}

impl SaveOutcome {
    fn message(self) -> &'static str {
        match self {
            SaveOutcome::Saved => SAVED_MESSAGE,
            SaveOutcome::NoTable => NO_TABLE_MESSAGE,
            SaveOutcome::Failed => SAVE_FAILED_MESSAGE,
        }
    }
}

pub async fn create_sheet(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreateSheetResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;
    let fields = upload::parse_multipart(multipart)
        .await
        .map_err(ApiError::Validation)?;
    let (file, option) = fields.validate()?;

    tracing::info!(
        filename = %file.filename,
        option = %option,
        bytes = file.data.len(),
        "received roster upload"
    );

    let UploadedFile { filename, data } = file;
    let conversion = convert_blocking(state.clone(), data, option.clone()).await?;

    let csv_data = conversion
        .non_empty_table()
        .map(export_csv)
        .unwrap_or_default();
    let outcome = persist(&state, &conversion, &filename, &option);

    Ok(Json(CreateSheetResponse {
        message: outcome.message().to_string(),
        filename,
        option,
        school_name: conversion.school_name.unwrap_or_default(),
        csv_data,
    }))
}

/// Run the conversion on the blocking pool (PDF parsing is CPU-bound).
async fn convert_blocking(
    state: Arc<AppState>,
    data: Vec<u8>,
    option: String,
) -> Result<Conversion, ApiError> {
    tokio::task::spawn_blocking(move || {
        roster_ingest::convert_bytes(
            &data,
            &state.uploads_dir,
            &option,
            state.backend.as_ref(),
            &state.settings,
        )
    })
    .await
    .map_err(|e| ApiError::TaskJoin(e.to_string()))?
    .map_err(ApiError::from)
}

/// Save the converted table next to earlier outputs. A failed write does not
/// fail the request; the CSV is still returned to the client.
fn persist(
    state: &AppState,
    conversion: &Conversion,
    filename: &str,
    option: &str,
) -> SaveOutcome {
    let Some(table) = conversion.non_empty_table() else {
        tracing::info!(filename, "no table rows converted, nothing to save");
        return SaveOutcome::NoTable;
    };

    let name = output_filename(
        filename,
        conversion.school_name.as_deref(),
        option,
        ExportFormat::Csv,
    );
    match save_export(table, ExportFormat::Csv, &state.output_dir, &name) {
        Ok(_) => SaveOutcome::Saved,
        Err(e) => {
            tracing::error!(error = %e, "failed to save processed CSV");
            SaveOutcome::Failed
        }
    }
}
