//! Noisefloor: Irreducible Error Estimation CLI Tool
//!
//! A command-line tool that scores every feature subset of the requested
//! sizes by how much outcome variance survives exact grouping on the
//! subset's discretized values.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use noisefloor::cli::Cli;
use noisefloor::pipeline::{
    combination_count, conditional_variance, discretize, load_dataset, split_outcome,
    Combinations, FeatureTable, PipelineError, Resolution, RewriteTable,
};
use noisefloor::report::{CsvSink, ResultSink, RunSummary, SubsetRecord};
use noisefloor::utils::{
    create_spinner, create_subset_bar, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolution: Resolution = cli
        .resolution
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let output_path = cli.output_path();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(
        &cli.input,
        &cli.outcome,
        &output_path,
        &resolution.to_string(),
        &cli.sizes,
        cli.log_outcome,
    );

    // Step 1: Load dataset and split out the outcome
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let mut df = load_dataset(&cli.input, cli.infer_schema_length)?;
    if !cli.drop_columns.is_empty() {
        df = df.drop_many(&cli.drop_columns);
    }
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);

    if rows == 0 {
        anyhow::bail!("Dataset has no rows - nothing to group");
    }

    let (mut features_df, outcome) = split_outcome(df, &cli.outcome, cli.log_outcome)?;
    if cli.log_outcome {
        print_success("Outcome extracted and log-transformed");
    } else {
        print_success("Outcome extracted");
    }

    let mut summary = RunSummary::new(rows, features_df.width());
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Prepare features - rewrites, encoding, discretization
    print_step_header(2, "Prepare Features");

    let step_start = Instant::now();
    if let Some(rewrite_path) = &cli.rewrites {
        let rewrites = RewriteTable::from_path(rewrite_path)?;
        let rewritten = rewrites.apply(&mut features_df)?;
        print_success(&format!(
            "Applied sentinel rewrites to {} column(s)",
            rewritten
        ));
    }

    let mut table = FeatureTable::from_dataframe(&features_df)?;
    let degenerate = discretize(&mut table, resolution);

    if degenerate.is_empty() {
        print_success(&format!(
            "Discretized numeric columns ({} resolution)",
            resolution
        ));
    } else {
        for column in &degenerate {
            print_warning(&format!(
                "Column '{}' collapsed to {} of {} requested bins",
                column.name, column.achieved, column.requested
            ));
        }
        print_success("Discretization complete (collapsed bins still partition rows)");
    }
    summary.set_degenerate_columns(degenerate.into_iter().map(|d| d.name).collect());

    let prepare_elapsed = step_start.elapsed();
    summary.set_prepare_time(prepare_elapsed);
    print_step_time(prepare_elapsed);

    // Step 3: Enumerate subsets and write one record each
    print_step_header(3, "Evaluate Subsets");

    let step_start = Instant::now();
    let names = table.names();
    let feature_count = table.feature_count();
    let mut sink = CsvSink::create(&output_path, &names)?;

    for &size in &cli.sizes {
        if size < 1 || size > feature_count {
            let err = PipelineError::InvalidSubsetSize {
                size,
                feature_count,
            };
            print_warning(&format!("Skipping: {}", err));
            summary.add_skipped_size(size, err.to_string());
            continue;
        }

        let total = combination_count(feature_count, size);
        let pb = create_subset_bar(total, size);

        let mut written = 0u64;
        for subset in Combinations::new(feature_count, size) {
            let columns = table.codes_for(&subset);
            let estimate = conditional_variance(&columns, &outcome);
            sink.write(&SubsetRecord::new(&subset, &names, estimate.error))?;
            written += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();

        print_success(&format!("Size {}: {} subset(s) evaluated", size, written));
        summary.add_pass(size, written);
    }

    sink.finish()?;

    if summary.passes.is_empty() {
        print_info("No valid subset sizes - results file contains only the header");
    } else {
        print_success(&format!("Results written to {}", output_path.display()));
    }

    let evaluate_elapsed = step_start.elapsed();
    summary.set_evaluate_time(evaluate_elapsed);
    print_step_time(evaluate_elapsed);

    // Display summary
    summary.display();

    // Final completion message
    print_completion();

    Ok(())
}
