// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reports for compbench results.
//!
//! All functions take a finished [`BenchmarkAggregate`] by shared reference
//! and never change it.
//!
//! # Quick Start
//!
//! ```no_run
//! use compbench_report::io::{read_results_json, write_all_outputs};
//!
//! let aggregate = read_results_json("results/results.json").unwrap();
//! write_all_outputs(&aggregate, "results").unwrap();
//! ```
//!
//! # Modules
//!
//! - [`markdown`] - `report.md` with per-file tables and failures
//! - [`text`] - Aligned plain-text tables and the console summary
//! - [`series`] - Scatter series per file and tool
//! - [`io`] - Writing everything to an output directory

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod io;
pub mod markdown;
pub mod series;
pub mod text;

pub use error::{ReportError, Result};
pub use io::{read_results_json, write_all_outputs};

use compbench_core::{BenchmarkAggregate, Level};

/// `name vX (level N)`, or just the identity for tools without levels.
pub(crate) fn run_label(aggregate: &BenchmarkAggregate, tool: &str, level: Level) -> String {
    match aggregate.identity(tool) {
        Some(identity) if identity.takes_level => format!("{} (level {})", identity, level),
        Some(identity) => identity.to_string(),
        None => format!("{} (level {})", tool, level),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use compbench_core::{
        BenchmarkAggregate, FailureKind, RunError, RunResult, SkippedRun, ToolIdentity,
        TrialOutcome,
    };
    use std::path::PathBuf;
    use std::time::Duration;

    fn identity(name: &str, version: Option<&str>, takes_level: bool) -> ToolIdentity {
        ToolIdentity {
            name: name.to_string(),
            version: version.map(str::to_string),
            takes_level,
        }
    }

    fn completed(tool: &str, file: &str, level: i32, ct: u64, dt: u64, sizes: (u64, u64)) -> TrialOutcome {
        TrialOutcome::Completed(RunResult {
            tool: tool.to_string(),
            file: PathBuf::from(file),
            level,
            compression_time: Duration::from_millis(ct),
            decompression_time: Duration::from_millis(dt),
            original_size: sizes.0,
            compressed_size: sizes.1,
            decompressed_size: sizes.0,
        })
    }

    /// gzip and cat succeed everywhere; xz times out on history.json.
    pub(crate) fn sample_aggregate() -> BenchmarkAggregate {
        let history = "corpus/history.json";
        let empty = "corpus/empty.bin";

        BenchmarkAggregate::new(
            vec![
                identity("gzip", Some("1.12"), true),
                identity("xz", Some("5.4.1"), true),
                identity("cat", None, false),
            ],
            vec![PathBuf::from(history), PathBuf::from(empty)],
            vec![
                completed("gzip", history, 1, 250, 100, (4096, 1024)),
                completed("gzip", history, 9, 500, 100, (4096, 512)),
                TrialOutcome::Failed(RunError {
                    tool: "xz".to_string(),
                    file: PathBuf::from(history),
                    level: 1,
                    kind: FailureKind::Timeout,
                    reason: "process did not exit within 1.0s".to_string(),
                }),
                TrialOutcome::Skipped(SkippedRun {
                    tool: "xz".to_string(),
                    file: PathBuf::from(history),
                    level: 2,
                    failed_level: 1,
                }),
                completed("cat", history, 0, 2, 2, (4096, 4096)),
                completed("gzip", empty, 1, 1, 1, (0, 20)),
                completed("gzip", empty, 9, 1, 1, (0, 20)),
                completed("xz", empty, 1, 3, 1, (0, 32)),
                completed("xz", empty, 2, 3, 1, (0, 32)),
                completed("cat", empty, 0, 1, 1, (0, 0)),
            ],
            Utc::now(),
        )
    }
}
