//! End-to-end checks from an extracted document to the emitted CSV.
//!
//! Documents are built by hand (no PDF parsing) and pushed through the
//! conversion pipeline; the CSV output is read back with the `csv` crate.

use roster_core::{
    ConvertSettings, ExtractedDocument, ExtractedTable, MappedTable, Row, convert_document,
};
use roster_reporting::{ExportFormat, export_csv, output_filename, save_export};

fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Some(c.to_string())).collect()
}

fn roster_document(rows: Vec<Row>) -> ExtractedDocument {
    ExtractedDocument {
        page_count: 1,
        first_page_text: "Team O'Brien Academy\nRoster".into(),
        tables: vec![ExtractedTable { page: 1, rows }],
    }
}

/// Parse CSV text back into (header, records).
fn read_back(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, records)
}

fn rendered(table: &MappedTable) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|r| r.iter().map(|v| v.to_string()).collect())
        .collect()
}

#[test]
fn csv_round_trip_matches_mapped_table() {
    let doc = roster_document(vec![
        row(&["Student", "Division", "No Team ID"]),
        row(&["Doe, Jane", "B", "42"]),
        row(&["O'Neil, Pat \"PJ\"", "C", "7"]),
        vec![Some("Lee, Ann".into()), None, Some("8, 9".into())],
    ]);
    let conv = convert_document(&doc, "State", &ConvertSettings::default());
    let table = conv.table.unwrap();

    let text = export_csv(&table);
    let (header, records) = read_back(&text);

    assert_eq!(header, table.columns);
    assert_eq!(records, rendered(&table));
    assert_eq!(records[1][0], "Pat \"PJ\" O'Neil");
    assert_eq!(records[2][2], "8, 9");
}

#[test]
fn multi_page_roster_keeps_repeated_headers() {
    let mut doc = roster_document(vec![
        row(&["Student", "Division", "No Team ID"]),
        row(&["Doe, Jane", "B", "42"]),
    ]);
    doc.page_count = 2;
    doc.tables.push(ExtractedTable {
        page: 2,
        rows: vec![
            row(&["Student", "Division", "No Team ID"]),
            row(&["Roe, Rick", "C", "43"]),
        ],
    });

    let conv = convert_document(&doc, "Invitational", &ConvertSettings::default());
    assert_eq!(conv.raw_rows, 4);
    let (_, records) = read_back(&export_csv(conv.table.as_ref().unwrap()));
    assert_eq!(records.len(), 3);
    assert_eq!(records[1][0], "Student");
    assert_eq!(records[2][0], "Rick Roe");
}

#[test]
fn header_only_writes_nothing() {
    let doc = roster_document(vec![row(&["Student", "Division", "No Team ID"])]);
    let conv = convert_document(&doc, "State", &ConvertSettings::default());
    assert!(conv.non_empty_table().is_none());
}

#[test]
fn saved_file_named_from_upload_school_and_option() {
    let doc = roster_document(vec![
        row(&["Student", "Division", "No Team ID"]),
        row(&["Doe, Jane", "B", "42"]),
    ]);
    let conv = convert_document(&doc, "State", &ConvertSettings::default());
    assert_eq!(conv.school_name.as_deref(), Some("O'Brien"));

    let dir = tempfile::tempdir().unwrap();
    let name = output_filename(
        "spring roster.pdf",
        conv.school_name.as_deref(),
        "State",
        ExportFormat::Csv,
    );
    let path = save_export(
        conv.non_empty_table().unwrap(),
        ExportFormat::Csv,
        dir.path(),
        &name,
    )
    .unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(file_name, "spring roster_O_Brien_State.csv");
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, export_csv(conv.table.as_ref().unwrap()));
}
