// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown report generation.
//!
//! The report lists the benchmarked tools and datasets, then for every file a
//! table of successful runs, the failures on that file, and links to the
//! scatter series files written next to it.

use crate::series::{series_file_name, SeriesKind};
use compbench_core::{BenchmarkAggregate, TrialOutcome};
use std::fmt::Write;
use std::path::Path;

/// Placeholder shown in the level column for tools that take no level.
pub const NO_LEVEL: &str = "—";

/// Generate the full markdown report.
pub fn generate_report(aggregate: &BenchmarkAggregate) -> String {
    let mut output = String::new();

    writeln!(output, "# Compression benchmark results").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Started: {} | Finished: {}",
        aggregate.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
        aggregate.finished_at().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .unwrap();
    writeln!(output).unwrap();

    writeln!(output, "## Benchmarked tools").unwrap();
    writeln!(output).unwrap();
    for identity in aggregate.tools() {
        writeln!(output, "* {}", identity).unwrap();
    }
    writeln!(output).unwrap();

    writeln!(output, "## Datasets").unwrap();
    writeln!(output).unwrap();
    for file in aggregate.files() {
        writeln!(output, "* {}", file.display()).unwrap();
    }

    for file in aggregate.files() {
        write_file_section(&mut output, aggregate, file);
    }

    let counts = aggregate.counts();
    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(
        output,
        "Total runs: {} ({} ok, {} failed, {} skipped)",
        counts.total(),
        counts.completed,
        counts.failed,
        counts.skipped
    )
    .unwrap();

    output
}

fn write_file_section(output: &mut String, aggregate: &BenchmarkAggregate, file: &Path) {
    writeln!(output).unwrap();
    writeln!(output, "## Results for `{}`", file.display()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "### Table").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Tool | Compression level | Compressed size (kB) | Compression time (s) | Decompression time (s) | Ratio |"
    )
    .unwrap();
    writeln!(output, "| --- | --- | --- | --- | --- | --- |").unwrap();

    for run in aggregate.successful_for_file(file) {
        let identity = aggregate.identity(&run.tool);
        let tool = identity.map_or_else(|| run.tool.clone(), ToString::to_string);
        let level = match identity {
            Some(identity) if !identity.takes_level => NO_LEVEL.to_string(),
            _ => run.level.to_string(),
        };

        writeln!(
            output,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} |",
            tool,
            level,
            run.compressed_size as f64 / 1024.0,
            run.compression_time.as_secs_f64(),
            run.decompression_time.as_secs_f64(),
            run.ratio()
        )
        .unwrap();
    }

    let unsuccessful: Vec<&TrialOutcome> = aggregate
        .for_file(file)
        .filter(|outcome| !outcome.is_successful())
        .collect();
    if !unsuccessful.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "### Failures").unwrap();
        writeln!(output).unwrap();
        for outcome in unsuccessful {
            let label = crate::run_label(aggregate, outcome.tool(), outcome.level());
            match outcome {
                TrialOutcome::Failed(error) => {
                    writeln!(output, "* {}: {} ({})", label, error.reason, error.kind).unwrap()
                }
                TrialOutcome::Skipped(skipped) => writeln!(
                    output,
                    "* {}: skipped after failure at level {}",
                    label, skipped.failed_level
                )
                .unwrap(),
                TrialOutcome::Completed(_) => {}
            }
        }
    }

    for kind in SeriesKind::ALL {
        writeln!(output).unwrap();
        writeln!(output, "### {}", kind.title()).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "[series data]({})", series_file_name(file, kind)).unwrap();
    }
}
