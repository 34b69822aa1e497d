// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plain-text tables.
//!
//! `report.txt` holds one table per file with the compressed size in bytes.
//! The console summary shows the same runs with the relative size in
//! per-mille instead.

use compbench_core::{BenchmarkAggregate, TrialOutcome};
use std::fmt::Write;
use std::path::Path;

const COLUMN_GAP: &str = "  ";

/// Which size column to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeColumn {
    /// `CS`: compressed bytes.
    Compressed,
    /// `RT`: compressed / original × 1000.
    Relative,
}

impl SizeColumn {
    fn header(&self) -> &'static str {
        match self {
            Self::Compressed => "CS",
            Self::Relative => "RT",
        }
    }
}

#[derive(Debug)]
struct Table {
    headers: [&'static str; 5],
    rows: Vec<[String; 5]>,
}

impl Table {
    fn for_file(aggregate: &BenchmarkAggregate, file: &Path, size: SizeColumn) -> Self {
        let rows = aggregate
            .for_file(file)
            .map(|outcome| row(aggregate, outcome, size))
            .collect();

        Self {
            headers: ["Tool", size.header(), "CT", "DT", "Result"],
            rows,
        }
    }

    fn render(&self) -> String {
        let mut widths = self.headers.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        let headers = self.headers.map(str::to_string);
        push_line(&mut output, &headers, &widths);
        push_line(&mut output, &widths.map(|w| "-".repeat(w)), &widths);
        for row in &self.rows {
            push_line(&mut output, row, &widths);
        }
        output
    }
}

/// Text and result columns align left, numbers right.
fn push_line(output: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        let padding = " ".repeat(width - cell.chars().count());
        if (1..=3).contains(&i) {
            line.push_str(&padding);
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&padding);
        }
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

fn row(aggregate: &BenchmarkAggregate, outcome: &TrialOutcome, size: SizeColumn) -> [String; 5] {
    let label = crate::run_label(aggregate, outcome.tool(), outcome.level());
    let dash = || "-".to_string();

    match outcome {
        TrialOutcome::Completed(run) => [
            label,
            match size {
                SizeColumn::Compressed => run.compressed_size.to_string(),
                SizeColumn::Relative => run.relative_size_permille().to_string(),
            },
            run.compression_time.as_millis().to_string(),
            run.decompression_time.as_millis().to_string(),
            "Ok".to_string(),
        ],
        TrialOutcome::Failed(error) => [label, dash(), dash(), dash(), error.reason.clone()],
        TrialOutcome::Skipped(_) => [label, dash(), dash(), dash(), "Skipped".to_string()],
    }
}

/// Aligned table of every outcome on `file`, with compressed sizes in bytes.
pub fn file_table(aggregate: &BenchmarkAggregate, file: &Path) -> String {
    Table::for_file(aggregate, file, SizeColumn::Compressed).render()
}

/// Generate `report.txt`.
pub fn generate_text_report(aggregate: &BenchmarkAggregate) -> String {
    let mut output = String::new();

    writeln!(output, "# Compression benchmark").unwrap();
    for file in aggregate.files() {
        writeln!(output).unwrap();
        writeln!(output, "## Results for {}:", file.display()).unwrap();
        writeln!(output).unwrap();
        output.push_str(&file_table(aggregate, file));
    }

    output
}

/// Summary printed to the console after a run.
pub fn console_summary(aggregate: &BenchmarkAggregate) -> String {
    let mut output = String::new();

    for file in aggregate.files() {
        writeln!(output, "{}:", file.display()).unwrap();
        output.push_str(&Table::for_file(aggregate, file, SizeColumn::Relative).render());
        writeln!(output).unwrap();
    }

    let counts = aggregate.counts();
    writeln!(
        output,
        "{} runs: {} ok, {} failed, {} skipped",
        counts.total(),
        counts.completed,
        counts.failed,
        counts.skipped
    )
    .unwrap();

    output
}
