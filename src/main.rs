//! Driver for the fertility-correlates study: load the sources, merge on
//! country, then run three nested regressions with VIF diagnostics.

use anyhow::{Context, Result};
use tfr_correlates::data::columns;
use tfr_correlates::data::{load_custom, load_demographics, load_gdp, load_workforce};
use tfr_correlates::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DataConfig::default();

    println!("Loading and preprocessing data...");
    let demographics = load_demographics(&config).context("demographic source")?;
    let workforce = load_workforce(&config).context("workforce source")?;
    let gdp = load_gdp(&config).context("GDP per capita source")?;

    let merged =
        merge_on_country(&[demographics, workforce, gdp]).context("merging indicator tables")?;
    log::info!("merged dataset holds {} countries", merged.n_rows());

    let custom = load_custom(&config).context("custom source")?;

    run_experiment(
        "Basic Factors",
        &merged,
        &[columns::GDP_LOG, columns::WORKFORCE],
    )?;

    run_experiment(
        "With Teen Births",
        &merged,
        &[columns::GDP_LOG, columns::WORKFORCE, columns::TEEN_BIRTH_LOG],
    )?;

    let mut dummy_predictors = vec![columns::GDP_LOG, columns::WORKFORCE, columns::TEEN_BIRTH_LOG];
    dummy_predictors.extend(columns::CULTURAL_DUMMIES);
    run_experiment("With Cultural Dummies", &custom, &dummy_predictors)?;

    Ok(())
}

/// One experiment: select the predictor subset, report VIF, fit OLS with an
/// intercept, and print the summary.
fn run_experiment(label: &str, table: &Table, predictors: &[&str]) -> Result<()> {
    println!("\n--- Regression: {label} ---");

    let x = table
        .design_matrix(predictors)
        .with_context(|| format!("building design matrix for {label}"))?;
    let y = table
        .response(columns::TFR)
        .with_context(|| format!("extracting response for {label}"))?;

    let vif = vif_table(&x, predictors);
    print!("{}", format_vif_table(&vif));

    let fit = OlsRegressor::new()
        .fit(&x, &y)
        .with_context(|| format!("fitting {label}"))?;

    print!("\n{}", format_summary(label, &fit, predictors));
    Ok(())
}
