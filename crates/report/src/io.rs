// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for benchmark reports.
//!
//! This module writes every report format into one output directory and
//! reads saved results back for re-rendering.

use crate::error::{ReportError, Result};
use crate::markdown;
use crate::series::{scatter_plots, series_file_name};
use crate::text;
use compbench_core::BenchmarkAggregate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default output directory.
pub const OUTPUT_DIR: &str = "results";

/// Serialized aggregate.
pub const RESULTS_FILE: &str = "results.json";

/// Markdown report.
pub const MARKDOWN_FILE: &str = "report.md";

/// Plain-text report.
pub const TEXT_FILE: &str = "report.txt";

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote report file");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Ensure the output directory exists.
pub fn ensure_output_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write the aggregate to a JSON file.
pub fn write_results_json(aggregate: &BenchmarkAggregate, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_file(path, &to_json(aggregate, path)?)
}

/// Read an aggregate from a JSON file.
pub fn read_results_json(path: impl AsRef<Path>) -> Result<BenchmarkAggregate> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one series file per file and plot kind. Returns the written paths.
pub fn write_series(aggregate: &BenchmarkAggregate, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();

    for plot in scatter_plots(aggregate) {
        let path = dir.join(series_file_name(&plot.file, plot.kind));
        write_file(&path, &to_json(&plot, &path)?)?;
        written.push(path);
    }

    Ok(written)
}

/// Write all outputs (raw JSON, markdown, text and series) into `dir`.
///
/// Returns the paths written, results file first.
pub fn write_all_outputs(aggregate: &BenchmarkAggregate, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_output_dir(dir)?;

    let results = dir.join(RESULTS_FILE);
    write_results_json(aggregate, &results)?;

    let report = dir.join(MARKDOWN_FILE);
    write_file(&report, &markdown::generate_report(aggregate))?;

    let text_report = dir.join(TEXT_FILE);
    write_file(&text_report, &text::generate_text_report(aggregate))?;

    let mut written = vec![results, report, text_report];
    written.extend(write_series(aggregate, dir)?);

    info!(dir = %dir.display(), files = written.len(), "reports written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ScatterPlot;
    use crate::test_support::sample_aggregate;

    #[test]
    fn test_write_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/results");
        let aggregate = sample_aggregate();

        let written = write_all_outputs(&aggregate, &out).unwrap();

        // results, md, txt, and two series per file
        assert_eq!(written.len(), 3 + 2 * aggregate.files().len());
        assert!(out.join(RESULTS_FILE).is_file());
        assert!(out.join(MARKDOWN_FILE).is_file());
        assert!(out.join(TEXT_FILE).is_file());
        assert!(out.join("corpus_history.json_ttr.json").is_file());
        assert!(out.join("corpus_empty.bin_ttt.json").is_file());
    }

    #[test]
    fn test_results_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);
        let aggregate = sample_aggregate();

        write_results_json(&aggregate, &path).unwrap();
        let restored = read_results_json(&path).unwrap();

        assert_eq!(restored.counts(), aggregate.counts());
        assert_eq!(restored.tools(), aggregate.tools());
        assert_eq!(restored.outcomes(), aggregate.outcomes());
        assert_eq!(
            markdown::generate_report(&restored),
            markdown::generate_report(&aggregate)
        );
    }

    #[test]
    fn test_series_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        write_series(&sample_aggregate(), dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("corpus_history.json_ttr.json")).unwrap();
        let plot: ScatterPlot = serde_json::from_str(&content).unwrap();
        assert_eq!(plot.series.len(), 2);
        assert_eq!(plot.x_label, "Compression time (s)");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_results_json("/nonexistent/compbench/results.json").unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = read_results_json(&path).unwrap_err();
        assert!(matches!(err, ReportError::Json { .. }));
    }
}
