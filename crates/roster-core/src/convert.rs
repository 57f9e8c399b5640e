use std::path::Path;

use crate::mapping::{MappingConfig, map_table};
use crate::{
    Conversion, ConvertError, ExtractedDocument, ExtractionSettings, MappingWarning,
    RosterBackend, flatten_tables, school_name, top_line,
};

/// Everything the pipeline needs besides the PDF and the option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertSettings {
    pub extraction: ExtractionSettings,
    pub mapping: MappingConfig,
}

/// Run an already-extracted document through top-line and school-name
/// extraction, flattening and column mapping.
pub fn convert_document(
    doc: &ExtractedDocument,
    option: &str,
    settings: &ConvertSettings,
) -> Conversion {
    let mut warnings = Vec::new();

    let top = top_line(&doc.first_page_text).to_string();
    let school = school_name(&top).map(str::to_string);
    if school.is_none() {
        let w = MappingWarning::SchoolNameUnresolved {
            top_line: top.clone(),
        };
        tracing::warn!("{}", w);
        warnings.push(w);
    }
    tracing::info!(top_line = %top, school_name = school.as_deref().unwrap_or(""), "extracted top line");

    let raw = flatten_tables(&doc.tables);
    tracing::debug!(
        pages = doc.page_count,
        tables = doc.tables.len(),
        rows = raw.len(),
        "flattened PDF tables"
    );

    let outcome = map_table(&raw, option, &settings.mapping);
    warnings.extend(outcome.warnings);

    Conversion {
        top_line: top,
        school_name: school,
        raw_rows: raw.len(),
        table: outcome.table,
        warnings,
    }
}

/// Extract `path` with `backend` and convert the result.
///
/// Any backend failure aborts the conversion; data-quality issues only show
/// up as [`Conversion::warnings`].
pub fn convert_path(
    path: &Path,
    option: &str,
    backend: &dyn RosterBackend,
    settings: &ConvertSettings,
) -> Result<Conversion, ConvertError> {
    let doc = backend.extract(path, &settings.extraction)?;
    Ok(convert_document(&doc, option, settings))
}
