//! Loader and merge tests over on-disk CSV fixtures.

use std::path::PathBuf;
use tfr_correlates::data::columns;
use tfr_correlates::data::{
    load_custom, load_demographics, load_gdp, load_workforce, merge_on_country, DataConfig,
    DataError,
};

const DEMOGRAPHICS_HEADER: &str =
    "\"Region, subregion, country or area *\",Type,Year,Total Fertility Rate (live births per woman),Births by women aged 15 to 19 (per capita)";

/// Demographic fixture with the banner rows the UN export carries above its
/// real header.
fn write_demographics(dir: &std::path::Path, rows: &[&str]) -> PathBuf {
    let mut text = String::new();
    for i in 0..16 {
        text.push_str(&format!("banner line {i},,,,\n"));
    }
    text.push_str(DEMOGRAPHICS_HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }

    let path = dir.join("demographic_estimates.csv");
    std::fs::write(&path, text).expect("write fixture");
    path
}

fn write_csv(dir: &std::path::Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write fixture");
    path
}

fn config_with(dir: &std::path::Path) -> DataConfig {
    DataConfig {
        demographics_path: dir.join("demographic_estimates.csv"),
        demographics_header_offset: 16,
        demographic_year: 2023,
        workforce_path: dir.join("workforce.csv"),
        workforce_year: "2019".to_string(),
        gdp_path: dir.join("gdp.csv"),
        gdp_year: "2023".to_string(),
        custom_path: dir.join("custom.csv"),
    }
}

// ============================================================================
// Demographics Loader
// ============================================================================

#[test]
fn test_demographics_filters_and_log_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_demographics(
        dir.path(),
        &[
            "World,World,2023,2.3,0.02",
            "Austria,Country/Area,2023,1.5,0.01",
            "Austria,Country/Area,2022,1.6,0.012",
            "Belgium,Country/Area,2023,1.6,0.02",
            "Western Europe,Region,2023,1.7,0.015",
        ],
    );

    let table = load_demographics(&config_with(dir.path())).expect("load should succeed");

    // Only Country/Area rows for 2023 survive
    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.country(0), "Austria");
    assert_eq!(table.country(1), "Belgium");

    let cols = table.columns();
    assert_eq!(cols[0], columns::TFR);
    assert_eq!(cols[1], columns::TEEN_BIRTHS);
    assert_eq!(cols[2], columns::TEEN_BIRTH_LOG);

    let log_idx = table.column_index(columns::TEEN_BIRTH_LOG).unwrap();
    let expected = 0.01f64.ln();
    assert!((table.row(0)[log_idx].unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_demographics_non_positive_teen_births_is_domain_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_demographics(dir.path(), &["Austria,Country/Area,2023,1.5,0.0"]);

    let err = load_demographics(&config_with(dir.path())).unwrap_err();
    assert!(matches!(err, DataError::NonPositiveLog { .. }));
}

#[test]
fn test_demographics_empty_filter_is_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_demographics(dir.path(), &["Austria,Country/Area,1995,1.5,0.01"]);

    let err = load_demographics(&config_with(dir.path())).unwrap_err();
    assert!(matches!(err, DataError::EmptyFilter { .. }));
}

#[test]
fn test_demographics_missing_column_is_schema_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut text = String::new();
    for i in 0..16 {
        text.push_str(&format!("banner line {i},,,\n"));
    }
    // Header lacks the teen-birth column entirely
    text.push_str(
        "\"Region, subregion, country or area *\",Type,Year,Total Fertility Rate (live births per woman)\n",
    );
    text.push_str("Austria,Country/Area,2023,1.5\n");
    write_csv(dir.path(), "demographic_estimates.csv", &text);

    let err = load_demographics(&config_with(dir.path())).unwrap_err();
    match err {
        DataError::MissingColumn { column, .. } => assert_eq!(column, columns::TEEN_BIRTHS),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

// ============================================================================
// Workforce and GDP Loaders
// ============================================================================

#[test]
fn test_workforce_selects_year_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_csv(
        dir.path(),
        "workforce.csv",
        "Country Name,2018,2019\nAustria,0.39,0.4\nBelgium,0.48,0.5\n",
    );

    let table = load_workforce(&config_with(dir.path())).expect("load should succeed");

    assert_eq!(table.columns(), &[columns::WORKFORCE.to_string()]);
    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.row(0)[0], Some(0.4));
    assert_eq!(table.row(1)[0], Some(0.5));
}

#[test]
fn test_workforce_missing_year_column_is_schema_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_csv(
        dir.path(),
        "workforce.csv",
        "Country Name,2018\nAustria,0.39\n",
    );

    let err = load_workforce(&config_with(dir.path())).unwrap_err();
    match err {
        DataError::MissingColumn { column, .. } => assert_eq!(column, "2019"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_gdp_adds_log_column_and_keeps_missing_cells() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_csv(
        dir.path(),
        "gdp.csv",
        "Country Name,2023\nAustria,10000\nBelgium,\n",
    );

    let table = load_gdp(&config_with(dir.path())).expect("load should succeed");

    assert_eq!(
        table.columns(),
        &[columns::GDP.to_string(), columns::GDP_LOG.to_string()]
    );
    assert!((table.row(0)[1].unwrap() - 10000f64.ln()).abs() < 1e-12);
    // Missing GDP stays missing through the log transform
    assert_eq!(table.row(1)[0], None);
    assert_eq!(table.row(1)[1], None);
}

#[test]
fn test_gdp_non_positive_is_domain_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_csv(dir.path(), "gdp.csv", "Country Name,2023\nAustria,-5\n");

    let err = load_gdp(&config_with(dir.path())).unwrap_err();
    assert!(matches!(err, DataError::NonPositiveLog { .. }));
}

// ============================================================================
// Custom Loader
// ============================================================================

#[test]
fn test_custom_passthrough() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_csv(
        dir.path(),
        "custom.csv",
        "Country,Total Fertility Rate (live births per woman),GDP Per Capita_log,SSA\nAustria,1.5,9.2,0\nNigeria,5.1,7.7,1\n",
    );

    let table = load_custom(&config_with(dir.path())).expect("load should succeed");

    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.country(1), "Nigeria");
    assert_eq!(table.columns().len(), 3);
    let ssa = table.column_index("SSA").unwrap();
    assert_eq!(table.row(1)[ssa], Some(1.0));
}

// ============================================================================
// Merge Over Loaded Tables
// ============================================================================

#[test]
fn test_merge_drops_countries_missing_from_any_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_demographics(
        dir.path(),
        &[
            "Austria,Country/Area,2023,1.5,0.01",
            "Belgium,Country/Area,2023,1.6,0.02",
            "Chile,Country/Area,2023,1.3,0.03",
        ],
    );
    write_csv(
        dir.path(),
        "workforce.csv",
        "Country Name,2019\nAustria,0.4\nChile,0.45\n",
    );
    write_csv(
        dir.path(),
        "gdp.csv",
        "Country Name,2023\nAustria,10000\nBelgium,20000\nChile,15000\n",
    );

    let config = config_with(dir.path());
    let merged = merge_on_country(&[
        load_demographics(&config).unwrap(),
        load_workforce(&config).unwrap(),
        load_gdp(&config).unwrap(),
    ])
    .expect("merge should succeed");

    // Belgium has no workforce row
    assert_eq!(merged.n_rows(), 2);
    assert_eq!(merged.country(0), "Austria");
    assert_eq!(merged.country(1), "Chile");
}

#[test]
fn test_merge_drops_rows_with_missing_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_demographics(
        dir.path(),
        &[
            "Austria,Country/Area,2023,1.5,0.01",
            "Belgium,Country/Area,2023,1.6,0.02",
        ],
    );
    write_csv(
        dir.path(),
        "workforce.csv",
        "Country Name,2019\nAustria,0.4\nBelgium,\n",
    );
    write_csv(
        dir.path(),
        "gdp.csv",
        "Country Name,2023\nAustria,10000\nBelgium,20000\n",
    );

    let config = config_with(dir.path());
    let merged = merge_on_country(&[
        load_demographics(&config).unwrap(),
        load_workforce(&config).unwrap(),
        load_gdp(&config).unwrap(),
    ])
    .expect("merge should succeed");

    assert_eq!(merged.n_rows(), 1);
    assert_eq!(merged.country(0), "Austria");
}
