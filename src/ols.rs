//! Least-squares estimation for the fertility regressions.
//!
//! Each experiment fits total fertility rate on a handful of indicator
//! columns, so the estimator here is deliberately small: two switches (fit an
//! intercept or not, compute inference or not), a pivoted-QR solve over the
//! augmented design, and a hard failure on rank deficiency. Confidence
//! intervals are always reported at the 95% level the summaries print.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use thiserror::Error;

/// Level of the coefficient confidence intervals in every summary.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// An R diagonal entry at or below this magnitude counts as zero when
/// deciding rank.
const RANK_TOLERANCE: f64 = 1e-10;

/// Ways a fit can fail. None of these are recoverable mid-analysis; the
/// driver surfaces them and aborts.
#[derive(Debug, Error)]
pub enum OlsError {
    #[error("design matrix has {x_rows} rows but the response has {y_len}")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("need more than {params} observations to fit {params} parameters, got {got}")]
    TooFewObservations { params: usize, got: usize },

    #[error("design matrix is rank-deficient (collinear or constant columns)")]
    SingularMatrix,
}

/// Ordinary least squares over a column-pivoted QR factorization.
///
/// A rank-deficient design (duplicated or collinear indicators, or a
/// constant column alongside the intercept) is rejected with
/// [`OlsError::SingularMatrix`] instead of silently dropping terms; the
/// nested-model comparisons only make sense when every requested predictor
/// is actually estimated.
///
/// # Example
///
/// ```rust,ignore
/// use tfr_correlates::ols::OlsRegressor;
///
/// let fit = OlsRegressor::new().fit(&x, &y)?;
/// println!("R² = {}", fit.r_squared);
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    with_intercept: bool,
    compute_inference: bool,
}

impl Default for OlsRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl OlsRegressor {
    /// An estimator with an intercept and full inference, the configuration
    /// every experiment uses.
    pub fn new() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
        }
    }

    /// Toggle the intercept term. The VIF auxiliary fits turn it off when
    /// the ones column is already among the regressors.
    pub fn with_intercept(mut self, on: bool) -> Self {
        self.with_intercept = on;
        self
    }

    /// Toggle standard errors, t/p-values, and confidence intervals.
    pub fn compute_inference(mut self, on: bool) -> Self {
        self.compute_inference = on;
        self
    }

    /// Fit the model: `x` holds one column per predictor (no ones column)
    /// and `y` the response, row-aligned.
    pub fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<OlsFit, OlsError> {
        let n = x.nrows();
        let p = x.ncols();

        if n != y.nrows() {
            return Err(OlsError::DimensionMismatch {
                x_rows: n,
                y_len: y.nrows(),
            });
        }

        let n_params = if self.with_intercept { p + 1 } else { p };
        if n_params == 0 {
            return Err(OlsError::SingularMatrix);
        }

        // The summary divides by the residual degrees of freedom, so n must
        // strictly exceed the parameter count.
        if n <= n_params {
            return Err(OlsError::TooFewObservations {
                params: n_params,
                got: n,
            });
        }

        // Solve over the augmented design [1 | X] so the intercept is
        // estimated jointly with the slopes, the same matrix the standard
        // errors come from.
        let design = if self.with_intercept {
            let mut d: Mat<f64> = Mat::zeros(n, p + 1);
            for i in 0..n {
                d[(i, 0)] = 1.0;
                for j in 0..p {
                    d[(i, j + 1)] = x[(i, j)];
                }
            }
            d
        } else {
            x.clone()
        };

        let estimates = solve_least_squares(&design, y)?;

        let (intercept, coefficients) = if self.with_intercept {
            (Some(estimates[0]), Col::from_fn(p, |j| estimates[j + 1]))
        } else {
            (None, estimates)
        };

        let mut fitted = Col::zeros(n);
        let mut residuals = Col::zeros(n);
        for i in 0..n {
            let mut pred = intercept.unwrap_or(0.0);
            for j in 0..p {
                pred += x[(i, j)] * coefficients[j];
            }
            fitted[i] = pred;
            residuals[i] = y[i] - pred;
        }

        // Total sum of squares is taken about the mean when the model has an
        // intercept and about zero otherwise, so the intercept row of a VIF
        // table gets the uncentered R² its ones-column regression calls for.
        let tss: f64 = if intercept.is_some() {
            let y_mean = y.iter().sum::<f64>() / n as f64;
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
        } else {
            y.iter().map(|&yi| yi.powi(2)).sum()
        };
        let rss: f64 = residuals.iter().map(|&e| e.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            // Constant response reproduced exactly
            1.0
        } else {
            0.0
        };

        let df_resid = (n - n_params) as f64;
        let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_resid;

        let mse = rss / df_resid;
        let rmse = mse.sqrt();

        let df_model = (n_params - if intercept.is_some() { 1 } else { 0 }) as f64;
        let (f_statistic, f_pvalue) = if df_model > 0.0 && mse > 0.0 {
            let f = ((tss - rss) / df_model) / mse;
            let p_value = FisherSnedecor::new(df_model, df_resid)
                .ok()
                .map_or(f64::NAN, |d| 1.0 - d.cdf(f));
            (f, p_value)
        } else {
            (f64::NAN, f64::NAN)
        };

        // Gaussian log-likelihood at the ML variance estimate rss/n.
        let (log_likelihood, aic, bic) = if rss > 0.0 {
            let nf = n as f64;
            let ll = -0.5 * nf * (1.0 + (2.0 * std::f64::consts::PI).ln() + (rss / nf).ln());
            let k = n_params as f64;
            (ll, 2.0 * k - 2.0 * ll, k * nf.ln() - 2.0 * ll)
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

        let inference = if self.compute_inference {
            Some(compute_inference(
                &design,
                &coefficients,
                intercept,
                mse,
                df_resid,
            )?)
        } else {
            None
        };

        Ok(OlsFit {
            coefficients,
            intercept,
            residuals,
            fitted,
            n_obs: n,
            n_params,
            r_squared,
            adj_r_squared,
            mse,
            rmse,
            f_statistic,
            f_pvalue,
            log_likelihood,
            aic,
            bic,
            inference,
        })
    }
}

/// One fitted fertility regression, frozen at fit time.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Slope estimates, one per predictor column in design order.
    pub coefficients: Col<f64>,
    /// Intercept estimate, when the model carries one.
    pub intercept: Option<f64>,
    /// Observed minus fitted response, per country row.
    pub residuals: Col<f64>,
    /// Fitted response, per country row.
    pub fitted: Col<f64>,
    /// Countries in the fit.
    pub n_obs: usize,
    /// Estimated parameters, intercept included.
    pub n_params: usize,
    /// Share of response variation explained. About the mean with an
    /// intercept, about zero without.
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Residual variance estimate rss / (n - p).
    pub mse: f64,
    pub rmse: f64,
    /// Overall significance test of the slopes against the intercept-only
    /// model.
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Per-term inference block; `None` when inference was switched off.
    pub inference: Option<Inference>,
}

impl OlsFit {
    /// Residual degrees of freedom, n - p. Positive for every successful fit.
    pub fn residual_df(&self) -> usize {
        self.n_obs - self.n_params
    }

    /// Degrees of freedom of the slope terms.
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_params - 1
        } else {
            self.n_params
        }
    }

    /// Apply the fitted line to new predictor rows.
    pub fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let base = self.intercept.unwrap_or(0.0);
        Col::from_fn(x.nrows(), |i| {
            let mut pred = base;
            for j in 0..x.ncols() {
                pred += x[(i, j)] * self.coefficients[j];
            }
            pred
        })
    }
}

/// Standard errors and the test statistics derived from them, aligned with
/// the coefficient vector. Intercept terms are carried separately so the
/// slope columns stay aligned with the predictor names.
#[derive(Debug, Clone)]
pub struct Inference {
    pub std_errors: Col<f64>,
    pub t_statistics: Col<f64>,
    /// Two-sided p-values from Student's t with n - p degrees of freedom.
    pub p_values: Col<f64>,
    pub ci_lower: Col<f64>,
    pub ci_upper: Col<f64>,
    pub intercept_std_error: Option<f64>,
    pub intercept_t: Option<f64>,
    pub intercept_p: Option<f64>,
    pub intercept_ci: Option<(f64, f64)>,
}

/// Solve min ‖y - Dβ‖² by column-pivoted QR, failing on rank deficiency.
fn solve_least_squares(design: &Mat<f64>, y: &Col<f64>) -> Result<Col<f64>, OlsError> {
    let k = design.ncols();

    let qr = design.col_piv_qr();
    let q = qr.compute_Q();
    let r = qr.R();
    let perm = qr.P();
    let (forward, _) = perm.arrays();

    // Pivoting pushes the small diagonal entries of R to the end, so any
    // entry at tolerance means the design is not full column rank.
    for i in 0..k {
        if r[(i, i)].abs() <= RANK_TOLERANCE {
            return Err(OlsError::SingularMatrix);
        }
    }

    let qty = q.transpose() * y;

    // Back-substitute the upper-triangular system R β = Q'y
    let mut solved = Col::zeros(k);
    for i in (0..k).rev() {
        let mut acc = qty[i];
        for j in (i + 1)..k {
            acc -= r[(i, j)] * solved[j];
        }
        solved[i] = acc / r[(i, i)];
    }

    // Undo the pivot: forward[j] is where original column j landed.
    Ok(Col::from_fn(k, |j| solved[forward[j]]))
}

/// Standard errors from the diagonal of mse · (D'D)⁻¹ over the augmented
/// design, with t, p, and interval columns derived per term.
fn compute_inference(
    design: &Mat<f64>,
    coefficients: &Col<f64>,
    intercept: Option<f64>,
    mse: f64,
    df_resid: f64,
) -> Result<Inference, OlsError> {
    let gram_inv = invert_gram(design)?;

    let t_dist = StudentsT::new(0.0, 1.0, df_resid).expect("positive residual df");
    let t_crit = t_dist.inverse_cdf(1.0 - (1.0 - CONFIDENCE_LEVEL) / 2.0);

    let term = |estimate: f64, variance: f64| {
        let se = if variance >= 0.0 {
            variance.sqrt()
        } else {
            f64::NAN
        };
        let t = if se > 0.0 { estimate / se } else { f64::NAN };
        let p = if t.is_finite() {
            2.0 * (1.0 - t_dist.cdf(t.abs()))
        } else {
            f64::NAN
        };
        (se, t, p, estimate - t_crit * se, estimate + t_crit * se)
    };

    let offset = if intercept.is_some() { 1 } else { 0 };
    let p = coefficients.nrows();

    let mut std_errors = Col::zeros(p);
    let mut t_statistics = Col::zeros(p);
    let mut p_values = Col::zeros(p);
    let mut ci_lower = Col::zeros(p);
    let mut ci_upper = Col::zeros(p);

    for j in 0..p {
        let d = j + offset;
        let (se, t, pv, lo, hi) = term(coefficients[j], mse * gram_inv[(d, d)]);
        std_errors[j] = se;
        t_statistics[j] = t;
        p_values[j] = pv;
        ci_lower[j] = lo;
        ci_upper[j] = hi;
    }

    let (intercept_std_error, intercept_t, intercept_p, intercept_ci) = match intercept {
        Some(b0) => {
            let (se, t, pv, lo, hi) = term(b0, mse * gram_inv[(0, 0)]);
            (Some(se), Some(t), Some(pv), Some((lo, hi)))
        }
        None => (None, None, None, None),
    };

    Ok(Inference {
        std_errors,
        t_statistics,
        p_values,
        ci_lower,
        ci_upper,
        intercept_std_error,
        intercept_t,
        intercept_p,
        intercept_ci,
    })
}

/// Invert D'D through a QR factorization, column by column of the identity.
fn invert_gram(design: &Mat<f64>) -> Result<Mat<f64>, OlsError> {
    let k = design.ncols();
    let gram = design.transpose() * design;

    let qr = gram.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    for i in 0..k {
        if r[(i, i)].abs() <= RANK_TOLERANCE {
            return Err(OlsError::SingularMatrix);
        }
    }

    let qt = q.transpose();
    let mut inv: Mat<f64> = Mat::zeros(k, k);
    for col in 0..k {
        for i in (0..k).rev() {
            let mut acc = qt[(i, col)];
            for j in (i + 1)..k {
                acc -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = acc / r[(i, i)];
        }
    }

    Ok(inv)
}
