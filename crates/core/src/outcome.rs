// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Trial outcome types.
//!
//! Every attempted or skipped (tool, file, level) combination produces
//! exactly one [`TrialOutcome`]. Reporting code matches on the enum, so each
//! arm has to be handled explicitly.

use crate::error::{FailureKind, TrialError};
use crate::tool::Level;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Serializes a [`Duration`] as fractional seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "invalid duration {}: expected non-negative seconds",
                secs
            )));
        }
        // Nearest nanosecond, so values written by `serialize` read back exactly.
        Ok(Duration::from_nanos((secs * 1e9).round() as u64))
    }
}

/// A successful, measured trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Tool name.
    pub tool: String,
    /// Input file.
    pub file: PathBuf,
    /// Compression level.
    pub level: Level,
    /// Wall-clock time of the compress process.
    #[serde(with = "duration_secs")]
    pub compression_time: Duration,
    /// Wall-clock time of the decompress process.
    #[serde(with = "duration_secs")]
    pub decompression_time: Duration,
    /// Size of the input in bytes.
    pub original_size: u64,
    /// Size of the compressed output in bytes.
    pub compressed_size: u64,
    /// Size of the decompressed output in bytes.
    pub decompressed_size: u64,
}

impl RunResult {
    /// Compression ratio, `original / max(compressed, 1)`.
    pub fn ratio(&self) -> f64 {
        self.original_size as f64 / self.compressed_size.max(1) as f64
    }

    /// Compressed size relative to the original, in per-mille.
    pub fn relative_size_permille(&self) -> u64 {
        (self.compressed_size as f64 / self.original_size.max(1) as f64 * 1000.0) as u64
    }
}

/// A trial that was attempted and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// Tool name.
    pub tool: String,
    /// Input file.
    pub file: PathBuf,
    /// Compression level.
    pub level: Level,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub reason: String,
}

impl RunError {
    /// Record a trial failure.
    pub fn from_trial_error(tool: &str, file: &Path, level: Level, error: &TrialError) -> Self {
        Self {
            tool: tool.to_string(),
            file: file.to_path_buf(),
            level,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// A level that was not attempted because the tool already failed on the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRun {
    /// Tool name.
    pub tool: String,
    /// Input file.
    pub file: PathBuf,
    /// Level that was skipped.
    pub level: Level,
    /// Level whose failure caused the skip.
    pub failed_level: Level,
}

/// Outcome of one (tool, file, level) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Trial ran and passed validation.
    Completed(RunResult),
    /// Trial ran and failed.
    Failed(RunError),
    /// Trial was not attempted.
    Skipped(SkippedRun),
}

impl TrialOutcome {
    /// Whether the trial produced a measurement.
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Tool name.
    pub fn tool(&self) -> &str {
        match self {
            Self::Completed(r) => &r.tool,
            Self::Failed(e) => &e.tool,
            Self::Skipped(s) => &s.tool,
        }
    }

    /// Input file.
    pub fn file(&self) -> &Path {
        match self {
            Self::Completed(r) => &r.file,
            Self::Failed(e) => &e.file,
            Self::Skipped(s) => &s.file,
        }
    }

    /// Compression level.
    pub fn level(&self) -> Level {
        match self {
            Self::Completed(r) => r.level,
            Self::Failed(e) => e.level,
            Self::Skipped(s) => s.level,
        }
    }

    /// The measurement, if the trial succeeded.
    pub fn as_result(&self) -> Option<&RunResult> {
        match self {
            Self::Completed(r) => Some(r),
            _ => None,
        }
    }

    /// The failure, if the trial ran and failed.
    pub fn as_error(&self) -> Option<&RunError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}
