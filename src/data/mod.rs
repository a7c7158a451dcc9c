//! Country-keyed data tables: loading, cleaning, and merging.
//!
//! Every source is read into the same [`Table`] representation (named numeric
//! columns keyed by country), merged with [`merge_on_country`], and consumed
//! as a `faer` design matrix / response vector.

mod load;
mod merge;
mod table;

pub use load::{load_custom, load_demographics, load_gdp, load_workforce, DataConfig};
pub use merge::{drop_missing, inner_join, merge_on_country};
pub use table::{DataError, Table};

/// Canonical column names shared by the loaders, the driver, and tests.
pub mod columns {
    /// Join key for every source table.
    pub const COUNTRY: &str = "Country";
    /// Response variable.
    pub const TFR: &str = "Total Fertility Rate (live births per woman)";
    pub const TEEN_BIRTHS: &str = "Births by women aged 15 to 19 (per capita)";
    pub const TEEN_BIRTH_LOG: &str = "Teen Birth Log";
    pub const WORKFORCE: &str = "female_workforce_participation";
    pub const GDP: &str = "GDP Per Capita";
    pub const GDP_LOG: &str = "GDP Per Capita_log";

    /// Mutually-exclusive cultural-group indicator columns of the custom
    /// dataset.
    pub const CULTURAL_DUMMIES: [&str; 4] = [
        "SSA",
        "East Asian-Buddhist-Hindu",
        "Non-SSA-Non-European-Muslim",
        "Latin American",
    ];
}
