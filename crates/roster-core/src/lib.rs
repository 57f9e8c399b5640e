use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod convert;
pub mod mapping;
pub mod mock;
pub mod school;
pub mod table;
pub mod text;

// Re-export for convenience
pub use backend::{BackendError, ExtractionSettings, RosterBackend};
pub use convert::{ConvertSettings, convert_document, convert_path};
pub use mapping::{MappingConfig, MappingOutcome, map_table};
pub use school::school_name;
pub use table::flatten_tables;
pub use text::top_line;

/// A single table row as extracted from the PDF. `None` marks a cell the
/// table finder produced without any text.
pub type Row = Vec<Option<String>>;

/// A table detected on a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    /// 1-based page number the table was found on.
    pub page: usize,
    pub rows: Vec<Row>,
}

/// Everything a backend pulls out of a roster PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub page_count: usize,
    /// Text of the first page, one line per `\n`, top to bottom.
    pub first_page_text: String,
    /// Tables in page order, then in detection order within a page.
    pub tables: Vec<ExtractedTable>,
}

/// Rows of every detected table concatenated into one list.
///
/// Repeated header rows (one per page or per table) are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Row>,
}

impl RawTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, treated as the column names.
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// A cell of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Null => Ok(()),
        }
    }
}

/// The reshaped roster: fixed output columns, one row per source data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl MappedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Every value of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}

/// Soft data-quality issues. They are logged and reported back but never
/// abort a conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingWarning {
    #[error("column for '{target}' not found in PDF table (tried {tried:?})")]
    MissingColumn { target: String, tried: Vec<String> },
    #[error("could not extract school name (second word) from top line: '{top_line}'")]
    SchoolNameUnresolved { top_line: String },
    #[error("no data rows extracted from PDF table ({rows} row(s) total)")]
    NoTableData { rows: usize },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("PDF extraction failed: {0}")]
    Extraction(#[from] BackendError),
}

/// Result of running a roster PDF through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub top_line: String,
    pub school_name: Option<String>,
    /// Number of rows in the flattened source table, header included.
    pub raw_rows: usize,
    /// `None` when the source table had no data rows.
    pub table: Option<MappedTable>,
    pub warnings: Vec<MappingWarning>,
}

impl Conversion {
    /// The mapped table, if it has at least one row.
    pub fn non_empty_table(&self) -> Option<&MappedTable> {
        self.table.as_ref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_table_splits_header_from_data() {
        let raw = RawTable::new(vec![
            vec![Some("Student".into())],
            vec![Some("Doe, Jane".into())],
        ]);
        assert_eq!(raw.header().unwrap()[0].as_deref(), Some("Student"));
        assert_eq!(raw.data_rows().len(), 1);
    }

    #[test]
    fn empty_raw_table_has_no_data_rows() {
        let raw = RawTable::default();
        assert!(raw.header().is_none());
        assert!(raw.data_rows().is_empty());
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Text("B".into()).to_string(), "B");
        assert_eq!(Value::Int(0).to_string(), "0");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn non_empty_table_filters_zero_rows() {
        let conv = Conversion {
            table: Some(MappedTable {
                columns: vec!["Student".into()],
                rows: vec![],
            }),
            ..Default::default()
        };
        assert!(conv.non_empty_table().is_none());
    }
}
