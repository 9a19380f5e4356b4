//! Column-keyed sentinel rewrites
//!
//! Survey-style datasets encode truncation in otherwise numeric columns with
//! sentinel strings (a ">90" cap marker, a "<1" floor marker). A rewrite
//! table maps those spellings to representative numeric values per column so
//! the general discretization can run. The table is opaque to the core: any
//! column it does not name passes through untouched.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A single sentinel replacement: an exact raw spelling and the numeric
/// value that stands in for it.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRule {
    pub matches: String,
    pub value: f64,
}

/// Per-column rewrite rules, keyed by column name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewriteTable(pub HashMap<String, Vec<RewriteRule>>);

impl RewriteTable {
    /// Load a rewrite table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rewrite table: {}", path.display()))?;
        let table = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse rewrite table: {}", path.display()))?;
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply the rewrites in place, converting each named string column to
    /// numeric. Values matching a rule take the rule's value; other strings
    /// are parsed as numbers; anything left unparsable becomes missing.
    ///
    /// Returns the number of columns rewritten. Named columns that are
    /// absent or already numeric are skipped.
    pub fn apply(&self, df: &mut DataFrame) -> Result<usize> {
        let mut rewritten = 0;

        for (col_name, rules) in &self.0 {
            let Ok(column) = df.column(col_name) else {
                continue;
            };
            if column.dtype() != &DataType::String {
                continue;
            }

            let values = column
                .str()
                .with_context(|| format!("Failed to read column '{}' as strings", col_name))?;
            let numeric: Vec<Option<f64>> = values
                .into_iter()
                .map(|v| {
                    v.and_then(|raw| {
                        rules
                            .iter()
                            .find(|rule| rule.matches == raw)
                            .map(|rule| rule.value)
                            .or_else(|| raw.trim().parse::<f64>().ok())
                    })
                })
                .collect();

            df.replace(col_name, Series::new(col_name.as_str().into(), numeric))
                .with_context(|| format!("Failed to replace column '{}'", col_name))?;
            rewritten += 1;
        }

        Ok(rewritten)
    }
}
