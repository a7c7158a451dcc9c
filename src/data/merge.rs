//! Inner joins on the country key and missing-row removal.

use super::table::{DataError, Table};

/// Inner join of two tables on the country key.
///
/// Left row order is preserved; left rows without a match are dropped. If a
/// key appears more than once in either input, the join fans out into one
/// output row per matching pair. Inputs are expected to carry one row per
/// country; duplicates are not corrected here.
pub fn inner_join(left: &Table, right: &Table) -> Table {
    let mut columns: Vec<String> = left.columns().to_vec();
    columns.extend(right.columns().iter().cloned());

    let mut out = Table::new("merged", columns);

    for i in 0..left.n_rows() {
        for k in 0..right.n_rows() {
            if left.country(i) == right.country(k) {
                let mut cells = left.row(i).to_vec();
                cells.extend_from_slice(right.row(k));
                out.push_row(left.country(i).to_string(), cells);
            }
        }
    }

    out
}

/// Remove every row containing a missing value in any column.
pub fn drop_missing(table: &Table) -> Table {
    let mut out = Table::new(table.name().to_string(), table.columns().to_vec());

    for i in 0..table.n_rows() {
        if table.row(i).iter().all(|c| c.is_some()) {
            out.push_row(table.country(i).to_string(), table.row(i).to_vec());
        }
    }

    out
}

/// Merge tables by sequential pairwise inner joins on the country key, then
/// drop rows with missing values.
///
/// The result contains the intersection of countries present in all inputs.
/// A merge that leaves zero rows is a [`DataError::EmptyJoin`]: downstream
/// analysis would be meaningless.
pub fn merge_on_country(tables: &[Table]) -> Result<Table, DataError> {
    let (first, rest) = tables.split_first().expect("at least one table to merge");

    let mut merged = first.clone();
    for table in rest {
        merged = inner_join(&merged, table);
    }

    let merged = drop_missing(&merged);
    if merged.is_empty() {
        return Err(DataError::EmptyJoin);
    }
    Ok(merged)
}
