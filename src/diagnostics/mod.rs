//! Regression diagnostics.
//!
//! Currently this covers multicollinearity detection via the variance
//! inflation factor:
//!
//! ```rust,ignore
//! use tfr_correlates::diagnostics::{vif_table, high_vif_predictors};
//!
//! let vif = vif_table(&x, &names);
//! let collinear = high_vif_predictors(&vif, 5.0);
//! ```

mod vif;

pub use vif::{high_vif_predictors, vif_table, VifEntry, VifTable, INTERCEPT_NAME};
