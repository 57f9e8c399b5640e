use crate::{ExtractedTable, RawTable};

/// Concatenate the rows of every table, in the order given, into one
/// [`RawTable`]. No header deduplication: a roster split over three pages
/// yields three header rows, the first of which becomes the column names.
pub fn flatten_tables(tables: &[ExtractedTable]) -> RawTable {
    let rows = tables
        .iter()
        .filter(|t| !t.rows.is_empty())
        .flat_map(|t| t.rows.iter().cloned())
        .collect();
    RawTable::new(rows)
}
