//! Shared helpers for the integration tests.

use faer::{Col, Mat};

/// Build a predictor matrix of pseudo-random values in [-1, 1] and a
/// response that is an exact linear function of it plus optional noise:
/// y = intercept + Σ_j (j+1)·x_j + noise. Returns (x, y, true slopes).
///
/// The generator is a fixed-multiplier LCG so every run sees identical data.
pub fn synthetic_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut state = seed;
    let mut draw = move || -> f64 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let slopes = Col::from_fn(n_features, |j| (j + 1) as f64);

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = draw();
            yi += x[(i, j)] * slopes[j];
        }
        y[i] = yi + noise_std * draw();
    }

    (x, y, slopes)
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
