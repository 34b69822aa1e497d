// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scatter series for plotting.
//!
//! For every file two plots are derived from successful runs: compression
//! time against ratio, and compression time against decompression time.
//! Each tool identity contributes one series. The data is written as JSON
//! so any plotting front end can render it.

use compbench_core::{BenchmarkAggregate, RunResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which pair of measurements a plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Compression time vs compression ratio.
    TimeToRatio,
    /// Compression time vs decompression time.
    TimeToTime,
}

impl SeriesKind {
    /// Both kinds, in report order.
    pub const ALL: [SeriesKind; 2] = [SeriesKind::TimeToRatio, SeriesKind::TimeToTime];

    /// File name suffix.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::TimeToRatio => "ttr",
            Self::TimeToTime => "ttt",
        }
    }

    /// Plot title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::TimeToRatio => "Compression time vs compression ratio",
            Self::TimeToTime => "Compression time vs decompression time",
        }
    }

    /// Label of the y axis.
    pub fn y_label(&self) -> &'static str {
        match self {
            Self::TimeToRatio => "Compression ratio",
            Self::TimeToTime => "Decompression time (s)",
        }
    }

    fn point(&self, run: &RunResult) -> Point {
        let x = run.compression_time.as_secs_f64();
        let y = match self {
            Self::TimeToRatio => run.ratio(),
            Self::TimeToTime => run.decompression_time.as_secs_f64(),
        };
        Point { x, y }
    }
}

/// One (x, y) sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Compression time in seconds.
    pub x: f64,
    /// Ratio or decompression time, depending on the plot.
    pub y: f64,
}

/// Points contributed by one tool identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    /// Tool identity, e.g. `zstd v1.5.5`.
    pub label: String,
    /// Samples in level order.
    pub points: Vec<Point>,
}

/// A full scatter plot for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    /// Input file the plot describes.
    pub file: PathBuf,
    /// Measurement pair.
    pub kind: SeriesKind,
    /// Plot title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// One series per tool with at least one successful run.
    pub series: Vec<ScatterSeries>,
}

/// File-system friendly form of a path: separators become `_`.
pub fn escape_name(file: &Path) -> String {
    file.to_string_lossy().replace(['/', '\\'], "_")
}

/// Name of the series file for `file`, e.g. `corpus_history.json_ttr.json`.
pub fn series_file_name(file: &Path, kind: SeriesKind) -> String {
    format!("{}_{}.json", escape_name(file), kind.suffix())
}

/// Build the plot of `kind` for one file.
pub fn scatter_plot(aggregate: &BenchmarkAggregate, file: &Path, kind: SeriesKind) -> ScatterPlot {
    let series = aggregate
        .tools()
        .iter()
        .filter_map(|identity| {
            let points: Vec<Point> = aggregate
                .successful_for_file(file)
                .filter(|run| run.tool == identity.name)
                .map(|run| kind.point(run))
                .collect();

            (!points.is_empty()).then(|| ScatterSeries {
                label: identity.to_string(),
                points,
            })
        })
        .collect();

    ScatterPlot {
        file: file.to_path_buf(),
        kind,
        title: kind.title().to_string(),
        x_label: "Compression time (s)".to_string(),
        y_label: kind.y_label().to_string(),
        series,
    }
}

/// Every plot for every file, in file order.
pub fn scatter_plots(aggregate: &BenchmarkAggregate) -> Vec<ScatterPlot> {
    aggregate
        .files()
        .iter()
        .flat_map(|file| {
            SeriesKind::ALL
                .iter()
                .map(move |kind| scatter_plot(aggregate, file, *kind))
        })
        .collect()
}
