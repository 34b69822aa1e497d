// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark execution engine for external compression tools.
//!
//! Every configured tool is run over every input file at every declared
//! level. Each trial compresses the file through the tool's stdin/stdout,
//! decompresses the result the same way, and records timings and sizes.
//! Failures are recorded as outcomes instead of aborting the run.
//!
//! # Quick Start
//!
//! ```no_run
//! use compbench_core::{run_benchmark, BenchSettings};
//!
//! # async fn example() -> compbench_core::Result<()> {
//! let settings = BenchSettings::load(None)?;
//! let aggregate = run_benchmark(&settings).await?;
//!
//! for result in aggregate.successful() {
//!     println!("{} {} -> {:.2}", result.tool, result.level, result.ratio());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`tool`] - Tool descriptions and argument templates
//! - [`registry`] - Ordered tool registry and the built-in tool table
//! - [`invoker`] - Launching one tool process with a timeout
//! - [`trial`] - One compress/decompress round trip
//! - [`driver`] - The files × tools × levels sweep
//! - [`aggregate`] - Read-only view of a finished run

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod driver;
pub mod error;
pub mod invoker;
pub mod outcome;
pub mod progress;
pub mod registry;
pub mod tool;
pub mod trial;
pub mod version;

pub use aggregate::{BenchmarkAggregate, OutcomeCounts};
pub use config::{BenchSettings, LevelSpec, ToolSpec};
pub use driver::{BenchmarkDriver, DriverOptions};
pub use error::{BenchError, FailureKind, Result, TrialError};
pub use outcome::{RunError, RunResult, SkippedRun, TrialOutcome};
pub use progress::{ProgressSink, SilentProgress, TracingProgress, TrialProgress};
pub use registry::ToolRegistry;
pub use tool::{Level, Tool, ToolIdentity};
pub use trial::{ProcessTrialRunner, TrialRunner};

/// Run the full benchmark described by `settings`, logging progress.
///
/// # Errors
///
/// Returns a [`BenchError`] if the settings are invalid or scratch storage
/// runs out mid-run. Individual trial failures are recorded in the
/// aggregate, not returned.
pub async fn run_benchmark(settings: &BenchSettings) -> Result<BenchmarkAggregate> {
    BenchmarkDriver::from_settings(settings)?.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_benchmark_without_files_is_empty() {
        let settings = BenchSettings {
            files: Vec::new(),
            probe_versions: false,
            ..BenchSettings::default()
        };

        let aggregate = run_benchmark(&settings).await.unwrap();
        assert!(aggregate.outcomes().is_empty());
        assert_eq!(aggregate.tools().len(), 16);
    }
}
