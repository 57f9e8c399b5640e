//! Reshaping the raw PDF table into the fixed roster schema.
//!
//! Output columns are fixed: `Student`, `Division`, `No Team ID`, `Team`,
//! followed by whatever extra columns the selected option declares. Source
//! columns are found by exact header name (or the first hit of an alias
//! list); everything the source cannot supply is left null.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MappedTable, MappingWarning, RawTable, Row, Value};

pub const STUDENT: &str = "Student";
pub const DIVISION: &str = "Division";
pub const NO_TEAM_ID: &str = "No Team ID";
pub const TEAM: &str = "Team";

/// The four columns every roster gets, in output order.
pub const BASE_COLUMNS: [&str; 4] = [STUDENT, DIVISION, NO_TEAM_ID, TEAM];

/// Source header names and option-dependent columns used by [`map_table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Source column holding "Last, First" names.
    pub student_column: String,
    pub division_column: String,
    /// Candidate source columns for `No Team ID`, tried in order.
    pub team_id_aliases: Vec<String>,
    /// Value written to every row of the `Team` column.
    pub team_default: i64,
    /// Extra output columns keyed by the exact option value.
    pub option_columns: BTreeMap<String, Vec<String>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        let mut option_columns = BTreeMap::new();
        option_columns.insert("Invitational".to_string(), vec!["Open Test".to_string()]);
        option_columns.insert(
            "State".to_string(),
            vec!["Topic 1".to_string(), "Topic 2".to_string()],
        );
        Self {
            student_column: STUDENT.to_string(),
            division_column: DIVISION.to_string(),
            team_id_aliases: ["No Team ID", "No Team Id", "Team ID", "Team Id", "ID"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            team_default: 0,
            option_columns,
        }
    }
}

impl MappingConfig {
    /// Output column names for `option`. Unknown options get only the base
    /// columns.
    pub fn output_columns(&self, option: &str) -> Vec<String> {
        let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        if let Some(extra) = self.option_columns.get(option) {
            columns.extend(extra.iter().cloned());
        }
        columns
    }
}

/// Result of [`map_table`]: the table (if any) plus the soft issues found on
/// the way.
#[derive(Debug, Clone, Default)]
pub struct MappingOutcome {
    pub table: Option<MappedTable>,
    pub warnings: Vec<MappingWarning>,
}

/// Reshape `raw` into the output schema for `option`.
///
/// The first raw row names the source columns; every following row becomes
/// one output row. With fewer than two raw rows nothing is mapped. Short
/// rows read as null for the cells they lack; surplus cells are ignored.
pub fn map_table(raw: &RawTable, option: &str, config: &MappingConfig) -> MappingOutcome {
    let mut warnings = Vec::new();

    let header = match raw.header() {
        Some(h) if !h.is_empty() && !raw.data_rows().is_empty() => h,
        _ => {
            tracing::warn!(rows = raw.len(), "no data rows in PDF table, skipping mapping");
            warnings.push(MappingWarning::NoTableData { rows: raw.len() });
            return MappingOutcome {
                table: None,
                warnings,
            };
        }
    };
    let data = raw.data_rows();

    let columns = config.output_columns(option);
    let mut rows = vec![vec![Value::Null; columns.len()]; data.len()];
    let out_idx = |name: &str| columns.iter().position(|c| c == name);

    // Student: "Last, First" -> "First Last"
    if let Some(dst) = out_idx(STUDENT) {
        match find_column(header, &config.student_column) {
            Some(src) => fill(&mut rows, data, src, dst, reorder_name),
            None => warnings.push(missing(STUDENT, std::slice::from_ref(&config.student_column))),
        }
    }

    if let Some(dst) = out_idx(DIVISION) {
        match find_column(header, &config.division_column) {
            Some(src) => fill(&mut rows, data, src, dst, str::to_string),
            None => warnings.push(missing(DIVISION, std::slice::from_ref(&config.division_column))),
        }
    }

    if let Some(dst) = out_idx(NO_TEAM_ID) {
        let src = config
            .team_id_aliases
            .iter()
            .find_map(|alias| find_column(header, alias));
        match src {
            Some(src) => fill(&mut rows, data, src, dst, str::to_string),
            None => warnings.push(missing(NO_TEAM_ID, &config.team_id_aliases)),
        }
    }

    if let Some(dst) = out_idx(TEAM) {
        for row in rows.iter_mut() {
            row[dst] = Value::Int(config.team_default);
        }
    }

    for w in &warnings {
        tracing::warn!("{}", w);
    }

    MappingOutcome {
        table: Some(MappedTable { columns, rows }),
        warnings,
    }
}

/// Index of the first header cell exactly equal to `name`.
fn find_column(header: &Row, name: &str) -> Option<usize> {
    header.iter().position(|h| h.as_deref() == Some(name))
}

fn fill(
    rows: &mut [Vec<Value>],
    data: &[Row],
    src: usize,
    dst: usize,
    transform: impl Fn(&str) -> String,
) {
    for (out, source) in rows.iter_mut().zip(data) {
        out[dst] = match source.get(src).and_then(|c| c.as_deref()) {
            Some(s) => Value::Text(transform(s)),
            None => Value::Null,
        };
    }
}

fn missing(target: &str, tried: &[String]) -> MappingWarning {
    MappingWarning::MissingColumn {
        target: target.to_string(),
        tried: tried.to_vec(),
    }
}

/// "Doe, Jane" -> "Jane Doe". Only the first two comma-separated parts are
/// used. Values without a comma are returned unchanged.
///
/// An empty first-name part still gets its separating space: "Doe," becomes
/// " Doe", and that leading space is written to the output as-is.
pub fn reorder_name(name: &str) -> String {
    if !name.contains(',') {
        return name.to_string();
    }
    let mut parts = name.split(',');
    let last = parts.next().unwrap_or("").trim();
    let first = parts.next().unwrap_or("").trim();
    format!("{} {}", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn roster() -> RawTable {
        RawTable::new(vec![
            row(&["Student", "Division", "No Team ID"]),
            row(&["Doe, Jane", "B", "42"]),
        ])
    }

    #[test]
    fn invitational_adds_open_test() {
        let outcome = map_table(&roster(), "Invitational", &MappingConfig::default());
        let table = outcome.table.unwrap();
        assert_eq!(
            table.columns,
            vec!["Student", "Division", "No Team ID", "Team", "Open Test"]
        );
        assert_eq!(
            table.rows,
            vec![vec![text("Jane Doe"), text("B"), text("42"), Value::Int(0), Value::Null]]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn state_adds_two_topics() {
        let table = map_table(&roster(), "State", &MappingConfig::default())
            .table
            .unwrap();
        assert_eq!(
            table.columns,
            vec!["Student", "Division", "No Team ID", "Team", "Topic 1", "Topic 2"]
        );
        assert!(table.rows[0][4].is_null());
        assert!(table.rows[0][5].is_null());
    }

    #[test]
    fn unknown_option_gets_base_columns() {
        let table = map_table(&roster(), "Regional", &MappingConfig::default())
            .table
            .unwrap();
        assert_eq!(table.columns, BASE_COLUMNS.to_vec());
    }

    #[test]
    fn option_match_is_case_sensitive() {
        let table = map_table(&roster(), "state", &MappingConfig::default())
            .table
            .unwrap();
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn header_only_yields_nothing() {
        let raw = RawTable::new(vec![row(&["Student", "Division"])]);
        let outcome = map_table(&raw, "State", &MappingConfig::default());
        assert!(outcome.table.is_none());
        assert_eq!(outcome.warnings, vec![MappingWarning::NoTableData { rows: 1 }]);
    }

    #[test]
    fn team_id_alias_order() {
        let raw = RawTable::new(vec![
            row(&["Student", "Division", "ID", "Team Id"]),
            row(&["Doe, Jane", "B", "7", "99"]),
        ]);
        let table = map_table(&raw, "", &MappingConfig::default()).table.unwrap();
        // "Team Id" precedes "ID" in the alias list
        assert_eq!(table.rows[0][2], text("99"));
    }

    #[test]
    fn missing_columns_are_null_with_warnings() {
        let raw = RawTable::new(vec![row(&["Name", "Grade"]), row(&["Doe, Jane", "9"])]);
        let outcome = map_table(&raw, "Invitational", &MappingConfig::default());
        let table = outcome.table.unwrap();
        assert!(table.rows[0][0].is_null());
        assert!(table.rows[0][1].is_null());
        assert!(table.rows[0][2].is_null());
        assert_eq!(table.rows[0][3], Value::Int(0));
        assert_eq!(outcome.warnings.len(), 3);
        assert!(matches!(
            &outcome.warnings[2],
            MappingWarning::MissingColumn { target, tried } if target == NO_TEAM_ID && tried.len() == 5
        ));
    }

    #[test]
    fn ragged_and_empty_cells_become_null() {
        let raw = RawTable::new(vec![
            row(&["Student", "Division", "No Team ID"]),
            row(&["Doe, Jane"]),
            vec![None, Some("C".into()), Some("1".into()), Some("extra".into())],
        ]);
        let table = map_table(&raw, "", &MappingConfig::default()).table.unwrap();
        assert_eq!(table.rows[0][0], text("Jane Doe"));
        assert!(table.rows[0][1].is_null());
        assert!(table.rows[1][0].is_null());
        assert_eq!(table.rows[1][1], text("C"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn repeated_header_rows_are_data() {
        let raw = RawTable::new(vec![
            row(&["Student", "Division", "No Team ID"]),
            row(&["Doe, Jane", "B", "42"]),
            row(&["Student", "Division", "No Team ID"]),
        ]);
        let table = map_table(&raw, "", &MappingConfig::default()).table.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][0], text("Student"));
    }

    #[test]
    fn first_duplicate_header_wins() {
        let raw = RawTable::new(vec![
            row(&["Division", "Division"]),
            row(&["A", "B"]),
        ]);
        let table = map_table(&raw, "", &MappingConfig::default()).table.unwrap();
        assert_eq!(table.rows[0][1], text("A"));
    }

    #[test]
    fn custom_config_aliases() {
        let config = MappingConfig {
            student_column: "Name".into(),
            team_id_aliases: vec!["Reg #".into()],
            team_default: 3,
            ..Default::default()
        };
        let raw = RawTable::new(vec![row(&["Name", "Reg #"]), row(&["Smith, Al", "5"])]);
        let table = map_table(&raw, "", &config).table.unwrap();
        assert_eq!(table.rows[0][0], text("Al Smith"));
        assert_eq!(table.rows[0][2], text("5"));
        assert_eq!(table.rows[0][3], Value::Int(3));
    }

    #[test]
    fn reorder_name_cases() {
        assert_eq!(reorder_name("Doe, Jane"), "Jane Doe");
        assert_eq!(reorder_name("  Doe ,  Jane  "), "Jane Doe");
        assert_eq!(reorder_name("Doe, Jane, Jr."), "Jane Doe");
        assert_eq!(reorder_name("Jane Doe"), "Jane Doe");
        assert_eq!(reorder_name("Doe,"), " Doe");
    }
}
