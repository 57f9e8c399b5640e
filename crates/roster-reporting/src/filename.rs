use std::path::Path;

use crate::ExportFormat;

/// Placeholder used in output filenames when no school name was found.
pub const UNKNOWN_SCHOOL: &str = "UnknownSchool";

/// Replace every non-alphanumeric character with `_`.
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{original stem}_{school}_{option}.{ext}` for a converted upload.
///
/// Directory components of `original` are dropped and only its last
/// extension is removed. School and option are sanitized; a missing or
/// empty school becomes [`UNKNOWN_SCHOOL`].
pub fn output_filename(
    original: &str,
    school: Option<&str>,
    option: &str,
    format: ExportFormat,
) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let school = match school {
        Some(s) if !s.is_empty() => sanitize_component(s),
        _ => UNKNOWN_SCHOOL.to_string(),
    };
    format!(
        "{}_{}_{}.{}",
        stem,
        school,
        sanitize_component(option),
        format.extension()
    )
}
