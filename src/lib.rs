//! Cross-country analysis of total fertility rate correlates.
//!
//! This library provides the building blocks for a one-shot regression study:
//! country-keyed data tables loaded from flat CSV sources, an inner-join
//! merge on country name, OLS estimation with full statistical inference,
//! and variance inflation factor diagnostics for multicollinearity.
//!
//! # Example
//!
//! ```rust,ignore
//! use tfr_correlates::prelude::*;
//!
//! let merged = merge_on_country(&[tfr, workforce, gdp])?;
//! let x = merged.design_matrix(&["GDP Per Capita_log", "female_workforce_participation"])?;
//! let y = merged.response("Total Fertility Rate (live births per woman)")?;
//!
//! let fit = OlsRegressor::new().fit(&x, &y)?;
//! println!("R² = {}", fit.r_squared);
//! ```

pub mod data;
pub mod diagnostics;
pub mod ols;
pub mod report;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::data::{merge_on_country, DataConfig, DataError, Table};
    pub use crate::diagnostics::{high_vif_predictors, vif_table, VifEntry, VifTable};
    pub use crate::ols::{Inference, OlsError, OlsFit, OlsRegressor};
    pub use crate::report::{format_summary, format_vif_table};
}

pub use crate::data::{merge_on_country, DataConfig, DataError, Table};
pub use crate::ols::{OlsError, OlsFit, OlsRegressor};
