//! In-memory feature table
//!
//! The subset loop needs exact-match equality over column values, nothing
//! more, so every column is reduced to one dense `u32` code per row:
//! numeric columns get bin codes from the discretizer, non-numeric columns
//! are dictionary-encoded by first appearance and pass through
//! discretization untouched. Missing values share a reserved code so they
//! group with each other.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::collections::HashMap;

/// Reserved code for missing values. Grouping is equality-only, so one
/// shared constant keeps all missing rows of a column in a single group.
pub const MISSING_CODE: u32 = u32::MAX;

/// Column payload. `Numeric` exists only between load and discretization;
/// the discretizer replaces it in place and the raw values are gone.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    /// Raw numeric values awaiting discretization.
    Numeric(Vec<Option<f64>>),
    /// Discretized numeric column: ordered bin codes in 0..bins.
    Binned { codes: Vec<u32>, bins: usize },
    /// Non-numeric column, dictionary-encoded by first appearance.
    Categorical { codes: Vec<u32>, levels: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct FeatureColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl FeatureColumn {
    /// Grouping codes for this column.
    ///
    /// # Panics
    /// Panics if the column is numeric and has not been discretized yet;
    /// the pipeline discretizes the whole table before any grouping.
    pub fn codes(&self) -> &[u32] {
        match &self.values {
            ColumnValues::Numeric(_) => {
                panic!("column '{}' has not been discretized", self.name)
            }
            ColumnValues::Binned { codes, .. } => codes,
            ColumnValues::Categorical { codes, .. } => codes,
        }
    }
}

/// Ordered named columns sharing one row count, index-aligned with the
/// outcome vector. Read-only after discretization.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub columns: Vec<FeatureColumn>,
    rows: usize,
}

impl FeatureTable {
    /// Build a feature table from the loaded DataFrame (outcome already
    /// split out). Numeric columns stay raw for the discretizer; everything
    /// else is cast to strings and dictionary-encoded.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let rows = df.height();
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let name = column.name().to_string();
            let values = if column.dtype().is_primitive_numeric() {
                let floats = column
                    .cast(&DataType::Float64)
                    .with_context(|| format!("Failed to read numeric column '{}'", name))?;
                let raw: Vec<Option<f64>> = floats
                    .f64()
                    .with_context(|| format!("Failed to read numeric column '{}'", name))?
                    .into_iter()
                    .collect();
                ColumnValues::Numeric(raw)
            } else {
                let strings = column
                    .cast(&DataType::String)
                    .with_context(|| format!("Failed to read column '{}' as strings", name))?;
                let ca = strings
                    .str()
                    .with_context(|| format!("Failed to read column '{}' as strings", name))?;
                encode_categorical(ca.into_iter())
            };
            columns.push(FeatureColumn { name, values });
        }

        Ok(Self { columns, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn feature_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order (the order that fixes the indicator
    /// vector layout in the output).
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The grouping-code slices for one subset of column indices, in
    /// subset order.
    pub fn codes_for(&self, subset: &[usize]) -> Vec<&[u32]> {
        subset.iter().map(|&i| self.columns[i].codes()).collect()
    }
}

/// Dictionary-encode string values by first appearance; missing values get
/// the reserved code.
fn encode_categorical<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ColumnValues {
    let mut lookup: HashMap<String, u32> = HashMap::new();
    let mut levels: Vec<String> = Vec::new();
    let mut codes = Vec::new();

    for value in values {
        let code = match value {
            None => MISSING_CODE,
            Some(v) => *lookup.entry(v.to_string()).or_insert_with(|| {
                levels.push(v.to_string());
                (levels.len() - 1) as u32
            }),
        };
        codes.push(code);
    }

    ColumnValues::Categorical { codes, levels }
}
