//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::PipelineError;

/// String spellings recognized as missing values during CSV load.
pub const NULL_TOKENS: [&str; 8] = ["", "NA", "N/A", "null", "NULL", "NaN", "nan", "None"];

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// CSV loading treats the [`NULL_TOKENS`] spellings as missing in every
/// column. `infer_schema_length` of 0 means a full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let null_tokens: Vec<PlSmallStr> =
                NULL_TOKENS.iter().map(|t| PlSmallStr::from_str(t)).collect();
            let schema_window = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_window)
                .with_null_values(Some(NullValues::AllColumns(null_tokens)))
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => return Err(PipelineError::UnsupportedFormat { extension }.into()),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    Ok(df)
}

/// Split the outcome column out of the loaded table.
///
/// Returns the remaining feature columns and the outcome as a dense vector,
/// optionally replaced by ln(value + 1). The transform runs exactly once,
/// before any discretization or grouping. A missing or non-numeric outcome
/// is fatal - groups need a complete, aligned outcome vector.
pub fn split_outcome(
    df: DataFrame,
    outcome: &str,
    log_transform: bool,
) -> Result<(DataFrame, Vec<f64>), PipelineError> {
    let column = df
        .column(outcome)
        .map_err(|_| PipelineError::MissingOutcomeColumn {
            column: outcome.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })?;

    if !column.dtype().is_primitive_numeric() {
        return Err(PipelineError::OutcomeNotNumeric {
            column: outcome.to_string(),
        });
    }

    let float_col = column
        .cast(&DataType::Float64)
        .map_err(|_| PipelineError::OutcomeNotNumeric {
            column: outcome.to_string(),
        })?;
    let values = float_col.f64().map_err(|_| PipelineError::OutcomeNotNumeric {
        column: outcome.to_string(),
    })?;

    let missing = values.null_count();
    if missing > 0 {
        return Err(PipelineError::OutcomeHasMissing {
            column: outcome.to_string(),
            count: missing,
        });
    }

    let mut outcome_values: Vec<f64> = values.into_no_null_iter().collect();
    if log_transform {
        for v in outcome_values.iter_mut() {
            *v = v.ln_1p();
        }
    }

    let features = df
        .drop(outcome)
        .expect("outcome column presence checked above");
    Ok((features, outcome_values))
}
