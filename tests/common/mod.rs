//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Number of rows in the reference customer table
pub const REFERENCE_ROWS: usize = 400;

/// Number of churned customers in the reference table (every fourth row)
pub const REFERENCE_POSITIVES: usize = 100;

/// Create a small raw table using the legacy source column names.
///
/// Rows 1 and 3 each contain a null and should be removed by cleaning.
pub fn create_raw_legacy_dataframe() -> DataFrame {
    df! {
        "CustomerId" => [1001i64, 1002, 1003, 1004, 1005],
        "Age" => [Some(25i64), Some(40), Some(52), None, Some(67)],
        "Tenure" => [1i64, 4, 7, 2, 12],
        "Balance" => [Some(0.0f64), None, Some(120000.0), Some(80000.0), Some(60000.0)],
        "NumOfProducts" => [1i64, 2, 1, 3, 2],
        "HasCrCard" => [1i64, 0, 1, 1, 0],
        "IsActiveMember" => [0i64, 1, 1, 0, 1],
        "Satisfaction Score" => [2i64, 4, 1, 3, 5],
        "Complain" => [1i64, 0, 0, 1, 0],
        "EstimatedSalary" => [50000.0f64, 72000.0, 91000.0, 38000.0, 110000.0],
        "Geography" => ["France", "Spain", "Germany", "France", "Spain"],
        "Exited" => [1i64, 0, 1, 0, 0],
    }
    .unwrap()
}

/// Create a cleaned customer table with canonical column names.
///
/// Labels are fixed (every fourth row churns) and the features are drawn from
/// a seeded generator, shifted so churners are older, complain more and are
/// less active. Calling this twice returns identical tables.
pub fn create_reference_dataframe(seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = REFERENCE_ROWS;

    let churn: Vec<i64> = (0..n).map(|i| i64::from(i % 4 == 0)).collect();

    let mut age = Vec::with_capacity(n);
    let mut tenure = Vec::with_capacity(n);
    let mut balance = Vec::with_capacity(n);
    let mut products = Vec::with_capacity(n);
    let mut credit_card = Vec::with_capacity(n);
    let mut active = Vec::with_capacity(n);
    let mut satisfaction = Vec::with_capacity(n);
    let mut complain = Vec::with_capacity(n);
    let mut salary = Vec::with_capacity(n);
    let mut geography = Vec::with_capacity(n);

    for &label in &churn {
        let churned = label == 1;
        age.push(if churned {
            rng.gen_range(40i64..=75)
        } else {
            rng.gen_range(18i64..=55)
        });
        tenure.push(rng.gen_range(0i64..=10));
        balance.push(rng.gen_range(0.0f64..250000.0));
        products.push(rng.gen_range(1i64..=4));
        credit_card.push(i64::from(rng.gen_bool(0.7)));
        active.push(i64::from(rng.gen_bool(if churned { 0.3 } else { 0.6 })));
        satisfaction.push(rng.gen_range(1i64..=5));
        complain.push(i64::from(rng.gen_bool(if churned { 0.7 } else { 0.1 })));
        salary.push(rng.gen_range(10000.0f64..200000.0));
        geography.push(["France", "Germany", "Spain"][rng.gen_range(0..3)]);
    }

    df! {
        "age" => age,
        "tenure" => tenure,
        "balance" => balance,
        "numofproducts" => products,
        "has_credit_card" => credit_card,
        "is_active_member" => active,
        "satisfaction_score" => satisfaction,
        "complain" => complain,
        "estimatedsalary" => salary,
        "geography" => geography,
        "churn" => churn,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Column names of a DataFrame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert that an error carries a specific pipeline error kind
pub fn assert_pipeline_error(err: &anyhow::Error, expected: fn(&churnlens::pipeline::PipelineError) -> bool) {
    let kind = err
        .downcast_ref::<churnlens::pipeline::PipelineError>()
        .unwrap_or_else(|| panic!("expected a pipeline error, got: {:#}", err));
    assert!(expected(kind), "unexpected pipeline error kind: {}", kind);
}
