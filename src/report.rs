//! Plain-text rendering of VIF tables and regression summaries.

use crate::diagnostics::VifTable;
use crate::ols::{Inference, OlsFit, CONFIDENCE_LEVEL};
use std::fmt::Write;

/// Render a VIF table as fixed-width text.
///
/// Infinite and undefined values print as `inf` / `NaN`.
pub fn format_vif_table(table: &VifTable) -> String {
    let width = table
        .entries
        .iter()
        .map(|e| e.feature.len())
        .chain(std::iter::once("feature".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>10}", "feature", "VIF");
    for entry in &table.entries {
        let _ = writeln!(out, "{:<width$}  {:>10.3}", entry.feature, entry.vif);
    }
    out
}

/// Render a regression summary: fit statistics followed by one row per term,
/// intercept first.
///
/// `names` are the predictor column names, aligned with the coefficient
/// vector. The inference columns are omitted when the fit was made without
/// them.
pub fn format_summary(label: &str, fit: &OlsFit, names: &[&str]) -> String {
    let mut out = String::new();

    let title = format!("{label} OLS Summary");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(
        out,
        "n = {}    residual df = {}",
        fit.n_obs,
        fit.residual_df()
    );
    let _ = writeln!(
        out,
        "R² = {:.4}    adj. R² = {:.4}",
        fit.r_squared, fit.adj_r_squared
    );
    let _ = writeln!(
        out,
        "F({}, {}) = {:.4}    p = {:.4}",
        fit.model_df(),
        fit.residual_df(),
        fit.f_statistic,
        fit.f_pvalue
    );
    let _ = writeln!(
        out,
        "log-likelihood = {:.4}    AIC = {:.4}    BIC = {:.4}",
        fit.log_likelihood, fit.aic, fit.bic
    );
    let _ = writeln!(out);

    let width = names
        .iter()
        .map(|n| n.len())
        .chain(std::iter::once("intercept".len()))
        .max()
        .unwrap_or(0);

    match &fit.inference {
        Some(inference) => {
            let alpha = 1.0 - CONFIDENCE_LEVEL;
            let _ = writeln!(
                out,
                "{:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}",
                "term",
                "coef",
                "std err",
                "t",
                "P>|t|",
                format!("[{:.3}", alpha / 2.0),
                format!("{:.3}]", 1.0 - alpha / 2.0),
            );
            if let Some(b0) = fit.intercept {
                write_inference_row(&mut out, width, "intercept", b0, intercept_stats(inference));
            }
            for (j, name) in names.iter().enumerate() {
                write_inference_row(
                    &mut out,
                    width,
                    name,
                    fit.coefficients[j],
                    (
                        inference.std_errors[j],
                        inference.t_statistics[j],
                        inference.p_values[j],
                        (inference.ci_lower[j], inference.ci_upper[j]),
                    ),
                );
            }
        }
        None => {
            let _ = writeln!(out, "{:<width$}  {:>10}", "term", "coef");
            if let Some(b0) = fit.intercept {
                let _ = writeln!(out, "{:<width$}  {:>10.4}", "intercept", b0);
            }
            for (j, name) in names.iter().enumerate() {
                let _ = writeln!(out, "{:<width$}  {:>10.4}", name, fit.coefficients[j]);
            }
        }
    }

    out
}

fn intercept_stats(inference: &Inference) -> (f64, f64, f64, (f64, f64)) {
    (
        inference.intercept_std_error.unwrap_or(f64::NAN),
        inference.intercept_t.unwrap_or(f64::NAN),
        inference.intercept_p.unwrap_or(f64::NAN),
        inference.intercept_ci.unwrap_or((f64::NAN, f64::NAN)),
    )
}

fn write_inference_row(
    out: &mut String,
    width: usize,
    name: &str,
    coef: f64,
    (se, t, p, (lo, hi)): (f64, f64, f64, (f64, f64)),
) {
    let _ = writeln!(
        out,
        "{:<width$}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}",
        name, coef, se, t, p, lo, hi,
    );
}
