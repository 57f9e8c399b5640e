use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use roster_core::{Conversion, MappingWarning, RawTable};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print what was pulled out of the PDF and how it was mapped.
pub fn print_conversion_summary(
    w: &mut dyn Write,
    pdf_name: &str,
    option: &str,
    conversion: &Conversion,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Converting {} ({})...", pdf_name, option)?;
    writeln!(w, "Top line:    {}", conversion.top_line)?;
    let school = conversion.school_name.as_deref().unwrap_or("(unknown)");
    if color.enabled() {
        writeln!(w, "School:      {}", school.bold())?;
    } else {
        writeln!(w, "School:      {}", school)?;
    }

    match conversion.non_empty_table() {
        Some(table) => writeln!(
            w,
            "Rows:        {} ({} columns: {})",
            table.len(),
            table.columns.len(),
            table.columns.join(", ")
        )?,
        None => writeln!(w, "Rows:        0 ({} raw rows)", conversion.raw_rows)?,
    }

    print_warnings(w, &conversion.warnings, color)
}

pub fn print_warnings(
    w: &mut dyn Write,
    warnings: &[MappingWarning],
    color: ColorMode,
) -> std::io::Result<()> {
    for warning in warnings {
        if color.enabled() {
            writeln!(w, "{} {}", "WARNING:".yellow(), warning)?;
        } else {
            writeln!(w, "WARNING: {}", warning)?;
        }
    }
    Ok(())
}

pub fn print_saved(w: &mut dyn Write, path: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Saved".green(), path.display())
    } else {
        writeln!(w, "Saved {}", path.display())
    }
}

/// Dump the flattened table exactly as extracted, one row per line.
/// Cells without text print as `-`.
pub fn print_raw_table(w: &mut dyn Write, raw: &RawTable, color: ColorMode) -> std::io::Result<()> {
    if raw.is_empty() {
        writeln!(w, "No tables found.")?;
        return Ok(());
    }
    for (i, row) in raw.rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|c| match c {
                Some(s) => format!("{:?}", s),
                None => "-".to_string(),
            })
            .collect();
        let line = format!("[{:>3}] {}", i, cells.join(" | "));
        if i == 0 && color.enabled() {
            writeln!(w, "{}", line.bold())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}
