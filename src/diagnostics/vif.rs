//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::ols::OlsRegressor;
use faer::{Col, Mat};

/// Name used for the intercept row of a [`VifTable`].
pub const INTERCEPT_NAME: &str = "intercept";

/// One row of a VIF table.
#[derive(Debug, Clone, PartialEq)]
pub struct VifEntry {
    /// Column name ([`INTERCEPT_NAME`] for the intercept row).
    pub feature: String,
    /// Variance inflation factor. `+∞` under (near-)perfect collinearity,
    /// `NaN` when the auxiliary regression could not be fit.
    pub vif: f64,
}

/// VIF values for each column of a design matrix, intercept included.
#[derive(Debug, Clone)]
pub struct VifTable {
    pub entries: Vec<VifEntry>,
}

impl VifTable {
    /// Look up the VIF for a column by name.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.feature == feature)
            .map(|e| e.vif)
    }

    /// Number of rows (predictors plus the intercept).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the Variance Inflation Factor for each predictor.
///
/// `x` holds the predictor columns only; an intercept column of ones is
/// appended internally, and the returned table has one row per predictor (in
/// input order) followed by an `intercept` row. For column j of the augmented
/// matrix, column j is regressed on all other columns and
///
/// VIF_j = 1 / (1 - R²_j)
///
/// # Interpretation
/// - VIF = 1: no correlation with other predictors
/// - VIF > 5: moderate multicollinearity (some sources say > 10)
/// - VIF > 10: high multicollinearity
///
/// Never panics on collinear input: an R² at 1 yields `+∞`, and an auxiliary
/// regression that cannot be fit yields `NaN`.
///
/// # Panics
/// If `names.len() != x.ncols()`.
pub fn vif_table(x: &Mat<f64>, names: &[&str]) -> VifTable {
    let n = x.nrows();
    let p = x.ncols();
    assert_eq!(names.len(), p, "one name per predictor column");

    let mut entries = Vec::with_capacity(p + 1);

    for j in 0..p {
        // All predictors except j; the intercept enters through the
        // auxiliary fit itself.
        let x_other = drop_column(x, j);
        let y_j = Col::from_fn(n, |i| x[(i, j)]);

        let model = OlsRegressor::new().compute_inference(false);

        entries.push(VifEntry {
            feature: names[j].to_string(),
            vif: vif_from_fit(model.fit(&x_other, &y_j).map(|f| f.r_squared)),
        });
    }

    // Intercept row: regress the ones column on the predictors. The auxiliary
    // design has no constant column, so R² is computed about zero.
    let ones = Col::from_fn(n, |_| 1.0);
    let model = OlsRegressor::new()
        .with_intercept(false)
        .compute_inference(false);

    entries.push(VifEntry {
        feature: INTERCEPT_NAME.to_string(),
        vif: vif_from_fit(model.fit(x, &ones).map(|f| f.r_squared)),
    });

    VifTable { entries }
}

fn vif_from_fit<E>(r_squared: Result<f64, E>) -> f64 {
    match r_squared {
        Ok(r2) => {
            if r2 < 1.0 - 1e-14 {
                (1.0 / (1.0 - r2)).max(1.0)
            } else {
                f64::INFINITY
            }
        }
        Err(_) => f64::NAN,
    }
}

fn drop_column(x: &Mat<f64>, drop: usize) -> Mat<f64> {
    let n = x.nrows();
    let p = x.ncols();
    let mut out: Mat<f64> = Mat::zeros(n, p - 1);
    let mut col_idx = 0;
    for k in 0..p {
        if k != drop {
            for i in 0..n {
                out[(i, col_idx)] = x[(i, k)];
            }
            col_idx += 1;
        }
    }
    out
}

/// Identify predictors with high multicollinearity.
///
/// Returns the feature names with VIF above the threshold (NaN rows are
/// skipped). Common thresholds: 5 or 10.
pub fn high_vif_predictors(table: &VifTable, threshold: f64) -> Vec<String> {
    table
        .entries
        .iter()
        .filter(|e| e.vif > threshold)
        .map(|e| e.feature.clone())
        .collect()
}
