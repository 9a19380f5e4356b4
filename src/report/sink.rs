//! Result sink - one output record per evaluated subset
//!
//! The sink is the pipeline's outbound collaborator: records stream out as
//! the subset loop produces them and are never retained. Each record also
//! carries an indicator column per original feature so downstream consumers
//! can pivot results without re-parsing the name string.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Fixed leading columns of the result header; one 0/1 indicator column per
/// feature follows, in feature-table order.
pub const HEADER: [&str; 3] = ["NUM_FEATURES", "CONCAT_FEATURES", "IRREDUCIBLE_ERROR"];

/// One evaluated subset, ready for the sink.
#[derive(Debug, Clone)]
pub struct SubsetRecord {
    pub size: usize,
    pub names: String,
    pub error: f64,
    pub indicators: Vec<u8>,
}

impl SubsetRecord {
    /// Build a record from a subset of column indices. `all_names` is the
    /// full feature-column list in table order; the concatenated name field
    /// and the indicator vector both derive from it.
    pub fn new(subset: &[usize], all_names: &[&str], error: f64) -> Self {
        let names = subset
            .iter()
            .map(|&i| all_names[i])
            .collect::<Vec<_>>()
            .join(", ");
        let mut indicators = vec![0u8; all_names.len()];
        for &i in subset {
            indicators[i] = 1;
        }
        Self {
            size: subset.len(),
            names,
            error,
            indicators,
        }
    }
}

/// Where subset records go. The production sink streams CSV; tests swap in
/// an in-memory sink.
pub trait ResultSink {
    fn write(&mut self, record: &SubsetRecord) -> Result<()>;

    /// Flush anything buffered. Called once after the last size pass.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Streaming CSV sink: header row, then one row per record.
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Create the output file and write the header row.
    pub fn create(path: &Path, feature_names: &[&str]) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create results file: {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);

        let header: Vec<&str> = HEADER.iter().copied().chain(feature_names.iter().copied()).collect();
        writer
            .write_record(&header)
            .with_context(|| format!("Failed to write results header: {}", path.display()))?;

        Ok(Self { writer })
    }
}

impl ResultSink for CsvSink {
    fn write(&mut self, record: &SubsetRecord) -> Result<()> {
        let mut row = Vec::with_capacity(3 + record.indicators.len());
        row.push(record.size.to_string());
        row.push(record.names.clone());
        row.push(record.error.to_string());
        row.extend(record.indicators.iter().map(|i| i.to_string()));
        self.writer
            .write_record(&row)
            .context("Failed to write result record")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush results file")?;
        Ok(())
    }
}

/// Collects records in memory. Backs unit and integration tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<SubsetRecord>,
}

impl ResultSink for MemorySink {
    fn write(&mut self, record: &SubsetRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
