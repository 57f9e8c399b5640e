use std::path::Path;

use pdfplumber::{Page, Pdf, Strategy, Table, TableSettings, WordOptions, words_to_text};

use roster_core::{BackendError, ExtractedDocument, ExtractedTable, ExtractionSettings, Row, RosterBackend};

mod rulings;

/// pdfplumber-based implementation of [`RosterBackend`].
///
/// This crate isolates the PDF parsing dependency so that the mapping and
/// reporting code paths do not transitively depend on it.
///
/// Tables are found from ruling lines only ("lines strict") unless
/// [`ExtractionSettings::strict_lines`] is off, in which case rectangle
/// edges count as rulings as well.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfplumberBackend;

impl PdfplumberBackend {
    pub fn new() -> Self {
        Self
    }
}

fn table_settings(settings: &ExtractionSettings) -> TableSettings {
    let strategy = if settings.strict_lines {
        Strategy::LatticeStrict
    } else {
        Strategy::Lattice
    };
    // The finder reads only the per-axis fields.
    TableSettings {
        strategy,
        snap_tolerance: settings.snap_tolerance,
        snap_x_tolerance: settings.snap_tolerance,
        snap_y_tolerance: settings.snap_tolerance,
        join_tolerance: settings.join_tolerance,
        join_x_tolerance: settings.join_tolerance,
        join_y_tolerance: settings.join_tolerance,
        ..TableSettings::default()
    }
}

/// Page text as lines joined by `\n`, words grouped with the configured
/// tolerances.
fn page_text(page: &Page, settings: &ExtractionSettings) -> String {
    let words = page.extract_words(&WordOptions {
        x_tolerance: settings.x_tolerance,
        y_tolerance: settings.y_tolerance,
        ..WordOptions::default()
    });
    words_to_text(&words, settings.y_tolerance)
}

impl RosterBackend for PdfplumberBackend {
    fn extract(
        &self,
        path: &Path,
        settings: &ExtractionSettings,
    ) -> Result<ExtractedDocument, BackendError> {
        let bytes = std::fs::read(path)?;
        let pdf = Pdf::open(&bytes, None).map_err(|e| BackendError::OpenError(e.to_string()))?;
        let raw = lopdf::Document::load_mem(&bytes)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        let page_ids: Vec<_> = raw.get_pages().into_values().collect();

        let table_settings = table_settings(settings);
        let mut doc = ExtractedDocument::default();

        for (index, page_result) in pdf.pages_iter().enumerate() {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_no = index + 1;
            doc.page_count = page_no;

            if index == 0 {
                doc.first_page_text = page_text(&page, settings);
            }

            let rulings = match page_ids.get(index) {
                Some(&id) => rulings::page_rulings(&raw, id, page.height()).map_err(|e| {
                    BackendError::ExtractionError(format!("page {}: {}", page_no, e))
                })?,
                None => rulings::Rulings::default(),
            };
            let ruled = Page::with_geometry(
                index,
                page.width(),
                page.height(),
                page.chars().to_vec(),
                rulings.lines,
                rulings.rects,
                rulings.curves,
            );

            let tables = ruled.find_tables(&table_settings);
            tracing::debug!(page = page_no, tables = tables.len(), "detected tables");
            for table in &tables {
                let rows = table_rows(table);
                if !rows.is_empty() {
                    doc.tables.push(ExtractedTable { page: page_no, rows });
                }
            }
        }

        Ok(doc)
    }
}

/// Cell texts row by row. Cells the finder produced without text stay
/// `None`; whitespace inside cells is kept verbatim.
fn table_rows(table: &Table) -> Vec<Row> {
    table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_lines_by_default() {
        let ts = table_settings(&ExtractionSettings::default());
        assert!(matches!(ts.strategy, Strategy::LatticeStrict));
        assert_eq!(ts.snap_x_tolerance, 5.0);
        assert_eq!(ts.snap_y_tolerance, 5.0);
        assert_eq!(ts.join_x_tolerance, 5.0);
        assert_eq!(ts.join_y_tolerance, 5.0);
    }

    #[test]
    fn configured_tolerances_reach_both_axes() {
        let ts = table_settings(&ExtractionSettings {
            snap_tolerance: 2.5,
            join_tolerance: 4.0,
            ..Default::default()
        });
        assert_eq!((ts.snap_x_tolerance, ts.snap_y_tolerance), (2.5, 2.5));
        assert_eq!((ts.join_x_tolerance, ts.join_y_tolerance), (4.0, 4.0));
    }

    #[test]
    fn relaxed_lines_use_lattice() {
        let ts = table_settings(&ExtractionSettings {
            strict_lines: false,
            ..Default::default()
        });
        assert!(matches!(ts.strategy, Strategy::Lattice));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfplumberBackend::new()
            .extract(&dir.path().join("absent.pdf"), &ExtractionSettings::default())
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn non_pdf_bytes_are_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.pdf");
        std::fs::write(&path, b"Student,Division\nDoe,B\n").unwrap();
        let err = PdfplumberBackend::new()
            .extract(&path, &ExtractionSettings::default())
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }
}
