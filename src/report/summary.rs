//! Run summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use std::time::Duration;

/// One completed enumeration pass.
#[derive(Debug, Clone)]
pub struct SizePass {
    pub size: usize,
    pub subsets: u64,
}

/// Summary of an estimation run, displayed after the results file is
/// written.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub features: usize,
    pub passes: Vec<SizePass>,
    pub skipped_sizes: Vec<(usize, String)>,
    pub degenerate_columns: Vec<String>,
    pub load_time: Duration,
    pub prepare_time: Duration,
    pub evaluate_time: Duration,
}

impl RunSummary {
    pub fn new(rows: usize, features: usize) -> Self {
        Self {
            rows,
            features,
            ..Default::default()
        }
    }

    pub fn add_pass(&mut self, size: usize, subsets: u64) {
        self.passes.push(SizePass { size, subsets });
    }

    pub fn add_skipped_size(&mut self, size: usize, reason: String) {
        self.skipped_sizes.push((size, reason));
    }

    pub fn set_degenerate_columns(&mut self, columns: Vec<String>) {
        self.degenerate_columns = columns;
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_prepare_time(&mut self, elapsed: Duration) {
        self.prepare_time = elapsed;
    }

    pub fn set_evaluate_time(&mut self, elapsed: Duration) {
        self.evaluate_time = elapsed;
    }

    /// Total subset records written across all passes.
    pub fn total_records(&self) -> u64 {
        self.passes.iter().map(|p| p.subsets).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("≈").cyan(),
            style("ESTIMATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("Feature columns"), Cell::new(self.features)]);

        for pass in &self.passes {
            table.add_row(vec![
                Cell::new(format!("Subsets of size {}", pass.size)),
                Cell::new(pass.subsets),
            ]);
        }

        table.add_row(vec![
            Cell::new("Records written"),
            Cell::new(self.total_records())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        if !self.skipped_sizes.is_empty() {
            table.add_row(vec![
                Cell::new("Sizes skipped"),
                Cell::new(self.skipped_sizes.len()).fg(Color::Yellow),
            ]);
        }

        if !self.degenerate_columns.is_empty() {
            table.add_row(vec![
                Cell::new("Collapsed columns"),
                Cell::new(self.degenerate_columns.len()).fg(Color::Yellow),
            ]);
        }

        let total = self.load_time + self.prepare_time + self.evaluate_time;
        table.add_row(vec![
            Cell::new("Total time"),
            Cell::new(format!("{:.2}s", total.as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.skipped_sizes.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Skipped subset sizes").yellow(),
                style(format!("({})", self.skipped_sizes.len())).dim()
            );
            for (size, reason) in &self.skipped_sizes {
                println!("        {} size {}: {}", style("•").dim(), size, reason);
            }
        }

        if !self.degenerate_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Columns binned coarser than requested").yellow(),
                style(format!("({})", self.degenerate_columns.len())).dim()
            );
            for column in &self.degenerate_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }
    }
}
