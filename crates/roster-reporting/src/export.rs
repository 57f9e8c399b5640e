use std::io::Write;
use std::path::{Path, PathBuf};

use roster_core::{MappedTable, Value};

use crate::{ExportFormat, ReportError};

/// Render `table` in the given format.
pub fn export(table: &MappedTable, format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => export_csv(table),
        ExportFormat::Json => {
            // Serializing a `serde_json::Value` cannot fail.
            serde_json::to_string_pretty(&export_json(table)).unwrap_or_default()
        }
    }
}

/// Write `table` to `dir/filename`, creating `dir` if needed.
///
/// Returns the path written. An existing file of the same name is
/// overwritten.
pub fn save_export(
    table: &MappedTable,
    format: ExportFormat,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(filename);
    let io_err = |source| ReportError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let content = export(table, format);
    let mut file = std::fs::File::create(&path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;

    tracing::info!(path = %path.display(), rows = table.len(), "saved converted roster");
    Ok(path)
}

pub fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| csv_escape(&f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Header line plus one line per row. Null cells are empty fields.
pub fn export_csv(table: &MappedTable) -> String {
    let mut out = String::new();
    csv_line(&mut out, table.columns.iter().cloned());
    for row in &table.rows {
        csv_line(&mut out, row.iter().map(Value::to_string));
    }
    out
}

/// One JSON object per row, keyed by column name, in an array.
pub fn export_json(table: &MappedTable) -> serde_json::Value {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(col, v)| {
                    let json = match v {
                        Value::Text(s) => serde_json::Value::String(s.clone()),
                        Value::Int(n) => serde_json::Value::from(*n),
                        Value::Null => serde_json::Value::Null,
                    };
                    (col.clone(), json)
                })
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MappedTable {
        MappedTable {
            columns: vec![
                "Student".into(),
                "Division".into(),
                "No Team ID".into(),
                "Team".into(),
                "Open Test".into(),
            ],
            rows: vec![vec![
                Value::Text("Jane Doe".into()),
                Value::Text("B".into()),
                Value::Text("42".into()),
                Value::Int(0),
                Value::Null,
            ]],
        }
    }

    #[test]
    fn test_csv_escape_quotes() {
        assert_eq!(csv_escape(r#"He said "hi""#), r#""He said ""hi""""#);
    }

    #[test]
    fn test_csv_escape_comma() {
        assert_eq!(csv_escape("Doe, Jane"), "\"Doe, Jane\"");
    }

    #[test]
    fn test_csv_escape_newline() {
        assert_eq!(csv_escape("a\nb"), "\"a\nb\"");
        assert_eq!(csv_escape("a\r\nb"), "\"a\r\nb\"");
    }

    #[test]
    fn test_csv_escape_clean() {
        assert_eq!(csv_escape("O'Brien"), "O'Brien");
    }

    #[test]
    fn test_csv_layout() {
        assert_eq!(
            export_csv(&table()),
            "Student,Division,No Team ID,Team,Open Test\nJane Doe,B,42,0,\n"
        );
    }

    #[test]
    fn test_csv_header_only_when_no_rows() {
        let mut t = table();
        t.rows.clear();
        assert_eq!(export_csv(&t), "Student,Division,No Team ID,Team,Open Test\n");
    }

    #[test]
    fn test_json_shape() {
        let json = export_json(&table());
        assert_eq!(json[0]["Student"], "Jane Doe");
        assert_eq!(json[0]["Team"], 0);
        assert!(json[0]["Open Test"].is_null());
    }

    #[test]
    fn test_save_export_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output_csvs");
        let first = save_export(&table(), ExportFormat::Csv, &out, "r.csv").unwrap();
        let mut t = table();
        t.rows.clear();
        let second = save_export(&t, ExportFormat::Csv, &out, "r.csv").unwrap();
        assert_eq!(first, second);
        assert_eq!(
            std::fs::read_to_string(&second).unwrap(),
            "Student,Division,No Team ID,Team,Open Test\n"
        );
    }

    #[test]
    fn test_save_export_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let err = save_export(&table(), ExportFormat::Csv, &blocker, "r.csv").unwrap_err();
        assert!(err.to_string().contains("not_a_dir"));
    }
}
