use axum::extract::Multipart;

use crate::error::ApiError;

/// An uploaded file with its data and metadata.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied filename; empty when the client sent `filename=""`.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload. Nothing is required at
/// this stage; see [`FormFields::validate`].
#[derive(Default)]
pub struct FormFields {
    pub file: Option<UploadedFile>,
    pub option: Option<String>,
}

impl FormFields {
    /// Check the request shape, in the order the client is told about it:
    /// file part, then filename, then option.
    pub fn validate(self) -> Result<(UploadedFile, String), ApiError> {
        let file = self
            .file
            .ok_or_else(|| ApiError::Validation("No PDF file part in the request".into()))?;
        if file.filename.is_empty() {
            return Err(ApiError::Validation("No PDF file selected".into()));
        }
        let option = self
            .option
            .ok_or_else(|| ApiError::Validation("No option selected in the request".into()))?;
        Ok((file, option))
    }
}

/// Parse a multipart form upload into structured form fields.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, String> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdfFile" => {
                // A plain form value under the file's name is not a file part.
                let Some(filename) = field.file_name().map(str::to_string) else {
                    let _ = field.bytes().await;
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();
                fields.file = Some(UploadedFile { filename, data });
            }
            "option" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read option: {}", e))?;
                fields.option = Some(val);
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    Ok(fields)
}
