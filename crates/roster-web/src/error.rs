use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use roster_ingest::IngestError;

use crate::models::ErrorResponse;

/// Everything a request can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request is missing a required part; answered with 400.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("conversion task failed: {0}")]
    TaskJoin(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Ingest(_) | ApiError::TaskJoin(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            ApiError::Validation(msg) => msg.clone(),
            other => {
                tracing::error!(error = ?other, "error processing PDF");
                format!("Error processing PDF. Check server logs. Details: {}", other)
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
