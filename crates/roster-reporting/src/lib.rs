use std::path::PathBuf;

use thiserror::Error;

mod export;
mod filename;

pub use export::{csv_escape, export, export_csv, export_json, save_export};
pub use filename::{UNKNOWN_SCHOOL, output_filename, sanitize_component};

/// Output format for a converted roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
