//! Source loaders: raw CSV files in, clean country-keyed tables out.

use super::columns;
use super::table::{DataError, Table};
use csv::StringRecord;
use log::info;
use std::path::{Path, PathBuf};

/// Row-type marker kept by the demographic filter.
const COUNTRY_ROW_TYPE: &str = "Country/Area";

/// Raw column names as they appear in the sources.
const DEMOGRAPHIC_COUNTRY: &str = "Region, subregion, country or area *";
const DEMOGRAPHIC_TYPE: &str = "Type";
const DEMOGRAPHIC_YEAR: &str = "Year";
const SOURCE_COUNTRY: &str = "Country Name";

/// Explicit configuration for every input source: path plus year selector.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// UN demographic estimates export.
    pub demographics_path: PathBuf,
    /// Banner rows above the true header row of the demographic export.
    pub demographics_header_offset: usize,
    /// Year of the demographic estimates to retain.
    pub demographic_year: i32,

    /// Female workforce participation table.
    pub workforce_path: PathBuf,
    /// Year column to select from the workforce table.
    pub workforce_year: String,

    /// GDP per capita table.
    pub gdp_path: PathBuf,
    /// Year column to select from the GDP table.
    pub gdp_year: String,

    /// Pre-merged table with predictors, response, and cultural dummies.
    pub custom_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            demographics_path: PathBuf::from("data/demographic_estimates.csv"),
            demographics_header_offset: 16,
            demographic_year: 2023,
            workforce_path: PathBuf::from("data/female_workforce_participation.csv"),
            workforce_year: "2019".to_string(),
            gdp_path: PathBuf::from("data/gdp_per_capita.csv"),
            gdp_year: "2023".to_string(),
            custom_path: PathBuf::from("data/variables_custom.csv"),
        }
    }
}

/// Load the UN demographic estimates.
///
/// The first `demographics_header_offset` physical rows are banner junk; the
/// next row is the true header. Rows are retained where the `Type` field is
/// `Country/Area` and `Year` matches the configured year, then the country
/// name, total fertility rate, and teen-birth columns are selected and a
/// log-transformed teen-birth column is appended.
pub fn load_demographics(config: &DataConfig) -> Result<Table, DataError> {
    let path = &config.demographics_path;
    let records = read_all_records(path)?;

    let header = records
        .get(config.demographics_header_offset)
        .ok_or_else(|| DataError::EmptyFilter { path: path.clone() })?;

    let country_idx = find_column(header, DEMOGRAPHIC_COUNTRY, path)?;
    let type_idx = find_column(header, DEMOGRAPHIC_TYPE, path)?;
    let year_idx = find_column(header, DEMOGRAPHIC_YEAR, path)?;
    let tfr_idx = find_column(header, columns::TFR, path)?;
    let teen_idx = find_column(header, columns::TEEN_BIRTHS, path)?;

    let mut table = Table::new(
        path.display().to_string(),
        vec![columns::TFR.to_string(), columns::TEEN_BIRTHS.to_string()],
    );

    for record in &records[config.demographics_header_offset + 1..] {
        let row_type = record.get(type_idx).unwrap_or("").trim();
        if row_type != COUNTRY_ROW_TYPE {
            continue;
        }
        let year = parse_cell(record.get(year_idx).unwrap_or(""));
        if year != Some(config.demographic_year as f64) {
            continue;
        }

        let country = record.get(country_idx).unwrap_or("").trim();
        table.push_row(
            country,
            vec![
                parse_cell(record.get(tfr_idx).unwrap_or("")),
                parse_cell(record.get(teen_idx).unwrap_or("")),
            ],
        );
    }

    if table.is_empty() {
        return Err(DataError::EmptyFilter { path: path.clone() });
    }

    info!(
        "loaded {} countries for {} from {}",
        table.n_rows(),
        config.demographic_year,
        path.display()
    );

    table.with_log_column(columns::TEEN_BIRTHS, columns::TEEN_BIRTH_LOG)
}

/// Load female workforce participation: country name plus the configured
/// year column.
pub fn load_workforce(config: &DataConfig) -> Result<Table, DataError> {
    let table = load_year_column(
        &config.workforce_path,
        &config.workforce_year,
        columns::WORKFORCE,
    )?;

    info!(
        "loaded {} workforce rows from {}",
        table.n_rows(),
        config.workforce_path.display()
    );
    Ok(table)
}

/// Load GDP per capita: country name plus the configured year column, with a
/// log-transformed column appended.
pub fn load_gdp(config: &DataConfig) -> Result<Table, DataError> {
    let table = load_year_column(&config.gdp_path, &config.gdp_year, columns::GDP)?;

    info!(
        "loaded {} GDP rows from {}",
        table.n_rows(),
        config.gdp_path.display()
    );

    table.with_log_column(columns::GDP, columns::GDP_LOG)
}

/// Load the pre-merged custom dataset (predictors, response, and cultural
/// dummies) unchanged into the common table representation.
pub fn load_custom(config: &DataConfig) -> Result<Table, DataError> {
    let path = &config.custom_path;
    let records = read_all_records(path)?;

    let header = records
        .first()
        .ok_or_else(|| DataError::EmptyFilter { path: path.clone() })?;
    let country_idx = find_column(header, columns::COUNTRY, path)?;

    let value_columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != country_idx)
        .map(|(j, name)| (j, name.trim().to_string()))
        .collect();

    let mut table = Table::new(
        path.display().to_string(),
        value_columns.iter().map(|(_, name)| name.clone()).collect(),
    );

    for record in &records[1..] {
        let country = record.get(country_idx).unwrap_or("").trim();
        table.push_row(
            country,
            value_columns
                .iter()
                .map(|(j, _)| parse_cell(record.get(*j).unwrap_or("")))
                .collect(),
        );
    }

    info!(
        "loaded {} custom rows from {}",
        table.n_rows(),
        path.display()
    );
    Ok(table)
}

/// Shared shape of the workforce and GDP sources: a `Country Name` column
/// plus year-indexed value columns, of which exactly one is selected.
fn load_year_column(path: &Path, year: &str, renamed: &str) -> Result<Table, DataError> {
    let records = read_all_records(path)?;

    let header = records
        .first()
        .ok_or_else(|| DataError::EmptyFilter {
            path: path.to_path_buf(),
        })?;
    let country_idx = find_column(header, SOURCE_COUNTRY, path)?;
    let year_idx = find_column(header, year, path)?;

    let mut table = Table::new(path.display().to_string(), vec![renamed.to_string()]);

    for record in &records[1..] {
        let country = record.get(country_idx).unwrap_or("").trim();
        table.push_row(country, vec![parse_cell(record.get(year_idx).unwrap_or(""))]);
    }

    Ok(table)
}

fn read_all_records(path: &Path) -> Result<Vec<StringRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result.map_err(|e| DataError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?);
    }
    Ok(records)
}

fn find_column(header: &StringRecord, name: &str, path: &Path) -> Result<usize, DataError> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::MissingColumn {
            column: name.to_string(),
            table: path.display().to_string(),
        })
}

/// Empty and `..` cells load as missing; anything else that fails to parse
/// as a number is treated the same way.
fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ".." {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
