//! The common tabular representation produced by every loader.

use faer::{Col, Mat};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, transforming, or consuming tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column {column:?} not found in {table}")]
    MissingColumn { column: String, table: String },

    #[error("row filter left no rows in {path:?}")]
    EmptyFilter { path: PathBuf },

    #[error("log of non-positive value {value} in column {column:?} for {country:?}")]
    NonPositiveLog {
        column: String,
        country: String,
        value: f64,
    },

    #[error("merge produced no rows; the inputs share no countries")]
    EmptyJoin,

    #[error("missing value in column {column:?} for {country:?}")]
    MissingValue { column: String, country: String },
}

/// A country-keyed table of named numeric columns.
///
/// Each row is one country plus one `Option<f64>` cell per column; `None`
/// marks a missing value. The country name is the join key and is held
/// outside the column list.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    countries: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl Table {
    /// Create an empty table with the given source label and column names.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            countries: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// # Panics
    /// If the cell count does not match the column count.
    pub fn push_row(&mut self, country: impl Into<String>, cells: Vec<Option<f64>>) {
        assert_eq!(cells.len(), self.columns.len(), "one cell per column");
        self.countries.push(country.into());
        self.rows.push(cells);
    }

    /// Source label used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Country key of row `i`.
    pub fn country(&self, i: usize) -> &str {
        &self.countries[i]
    }

    /// Cells of row `i`, aligned with `columns()`.
    pub fn row(&self, i: usize) -> &[Option<f64>] {
        &self.rows[i]
    }

    /// Index of a column by name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn require_column(&self, column: &str) -> Result<usize, DataError> {
        self.column_index(column)
            .ok_or_else(|| DataError::MissingColumn {
                column: column.to_string(),
                table: self.name.clone(),
            })
    }

    /// Project the table onto a subset of columns, preserving row order.
    pub fn select(&self, keep: &[&str]) -> Result<Table, DataError> {
        let indices = keep
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Table::new(
            self.name.clone(),
            keep.iter().map(|c| c.to_string()).collect(),
        );
        for (country, row) in self.countries.iter().zip(&self.rows) {
            out.push_row(country.clone(), indices.iter().map(|&j| row[j]).collect());
        }
        Ok(out)
    }

    /// Rename a column in place.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), DataError> {
        let idx = self.require_column(from)?;
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Append a natural-log transform of an existing column.
    ///
    /// Missing cells stay missing. A present value ≤ 0 is a
    /// [`DataError::NonPositiveLog`], since the log is undefined there.
    pub fn with_log_column(mut self, source: &str, new: &str) -> Result<Table, DataError> {
        let idx = self.require_column(source)?;

        let mut logged = Vec::with_capacity(self.rows.len());
        for (country, row) in self.countries.iter().zip(&self.rows) {
            match row[idx] {
                Some(v) if v <= 0.0 => {
                    return Err(DataError::NonPositiveLog {
                        column: source.to_string(),
                        country: country.clone(),
                        value: v,
                    });
                }
                Some(v) => logged.push(Some(v.ln())),
                None => logged.push(None),
            }
        }

        self.columns.push(new.to_string());
        for (row, cell) in self.rows.iter_mut().zip(logged) {
            row.push(cell);
        }
        Ok(self)
    }

    /// Build a design matrix from the named columns, row-aligned with the
    /// table. Any missing cell is an error; callers are expected to have
    /// dropped incomplete rows first.
    pub fn design_matrix(&self, predictors: &[&str]) -> Result<Mat<f64>, DataError> {
        let indices = predictors
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>, _>>()?;

        let n = self.rows.len();
        let mut x: Mat<f64> = Mat::zeros(n, indices.len());
        for i in 0..n {
            for (out_j, &j) in indices.iter().enumerate() {
                x[(i, out_j)] = self.cell_value(i, j, &self.columns[j])?;
            }
        }
        Ok(x)
    }

    /// Extract a response vector from one column.
    pub fn response(&self, column: &str) -> Result<Col<f64>, DataError> {
        let idx = self.require_column(column)?;

        let n = self.rows.len();
        let mut y = Col::zeros(n);
        for i in 0..n {
            y[i] = self.cell_value(i, idx, column)?;
        }
        Ok(y)
    }

    fn cell_value(&self, i: usize, j: usize, column: &str) -> Result<f64, DataError> {
        self.rows[i][j].ok_or_else(|| DataError::MissingValue {
            column: column.to_string(),
            country: self.countries[i].clone(),
        })
    }
}
