//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Noisefloor - Estimate the irreducible error of feature subsets via conditional variance
#[derive(Parser, Debug)]
#[command(name = "noisefloor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path for the per-subset result records (CSV).
    /// Defaults to the input directory with an '_errors' suffix
    /// (e.g., data.csv -> data_errors.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the outcome (dependent variable) column.
    /// All other columns are treated as candidate features.
    #[arg(short = 't', long)]
    pub outcome: String,

    /// Subset sizes to evaluate (comma-separated). One full enumeration
    /// pass over all C(n,k) feature combinations runs per size.
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub sizes: Vec<usize>,

    /// Discretization resolution for numeric feature columns.
    /// Options: "median" (binary split, default), "quartile" (4 bins),
    /// "decile" (10 bins)
    #[arg(long, default_value = "median")]
    pub resolution: String,

    /// Replace the outcome with ln(value + 1) before any analysis.
    /// Intended for right-skewed outcomes; applied exactly once, globally.
    #[arg(long, default_value = "false")]
    pub log_outcome: bool,

    /// Path to a JSON rewrite table mapping sentinel strings to numeric
    /// values per column, applied before discretization.
    /// Format: {"column": [{"matches": ">90", "value": 90.0}, ...], ...}
    #[arg(long)]
    pub rewrites: Option<PathBuf>,

    /// Columns to drop before processing (comma-separated).
    /// These columns are removed from the dataset before any analysis.
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the output path, deriving from the input if not explicitly provided.
    /// The derived path is in the same directory as the input with an '_errors' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_errors.csv", stem))
        })
    }
}
