//! Shared test utilities and fixture generators
#![allow(dead_code)] // each test binary uses a different subset of fixtures

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small table with a known grouping structure:
/// - `a` and `b` are already-binary features that agree row by row
/// - `outcome_flat` is constant inside each `a` group (estimate 0)
/// - `outcome_spread` varies inside each group with known variances
pub fn create_grouping_dataframe() -> DataFrame {
    df! {
        "a" => [0.0f64, 0.0, 1.0, 1.0],
        "b" => [0.0f64, 0.0, 1.0, 1.0],
        "outcome_flat" => [1.0f64, 1.0, 5.0, 5.0],
        "outcome_spread" => [1.0f64, 2.0, 5.0, 9.0],
    }
    .unwrap()
}

/// A mixed-type table exercising categoricals and missing values.
pub fn create_mixed_dataframe() -> DataFrame {
    df! {
        "age" => [Some(23.0f64), Some(41.0), None, Some(58.0), Some(35.0), Some(29.0)],
        "city" => [Some("NY"), Some("LA"), Some("NY"), None, Some("LA"), Some("NY")],
        "score" => [10.0f64, 20.0, 30.0, 40.0, 50.0, 60.0],
        "price" => [100.0f64, 120.0, 90.0, 200.0, 150.0, 110.0],
    }
    .unwrap()
}

/// Generate a random numeric table for stress-style tests.
pub fn create_random_dataframe(rows: usize, cols: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    let outcome: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect();
    columns.push(Column::new("outcome".into(), outcome));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Write a DataFrame to a temp CSV file; the TempDir keeps it alive.
pub fn write_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    (dir, path)
}
