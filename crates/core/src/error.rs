// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the benchmark engine.
//!
//! Two layers exist. [`TrialError`] describes why a single (tool, file, level)
//! trial failed; the driver turns it into a recorded outcome. [`BenchError`]
//! is fatal to the whole run: bad configuration, or running out of scratch
//! resources.

use crate::tool::Level;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure category of a trial, as recorded in the result stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The external binary could not be started.
    LaunchFailure,
    /// The process outlived the timeout and was killed.
    Timeout,
    /// The process exited with a failure status.
    NonZeroExit,
    /// Decompressed output size differs from the original size.
    RoundTripMismatch,
    /// The corpus file could not be opened or probed.
    InputUnreadable,
    /// I/O failed on an already-open scratch stream.
    StreamFailure,
    /// Scratch storage could not be acquired.
    ScratchExhausted,
}

impl FailureKind {
    /// Short label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaunchFailure => "launch failure",
            Self::Timeout => "timeout",
            Self::NonZeroExit => "non-zero exit",
            Self::RoundTripMismatch => "round-trip mismatch",
            Self::InputUnreadable => "input unreadable",
            Self::StreamFailure => "stream failure",
            Self::ScratchExhausted => "scratch exhausted",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while executing a single trial.
#[derive(Debug, Error)]
pub enum TrialError {
    /// Binary missing or not executable
    #[error("failed to launch {binary}: {source}")]
    Launch {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Process killed after exceeding its time budget
    #[error("process did not exit within {:.1}s", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    /// Process finished unsuccessfully
    #[error("process exited with {status}")]
    NonZeroExit { status: ExitStatus },

    /// Decompressed size does not match the original
    #[error("decompressed size {decompressed} is not equal to original size {original}")]
    RoundTripMismatch { original: u64, decompressed: u64 },

    /// Corpus file could not be opened or measured
    #[error("cannot read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Seek or size query failed on a scratch stream
    #[error("scratch stream error: {0}")]
    Stream(#[source] io::Error),

    /// Scratch storage could not be created or duplicated
    #[error("cannot acquire scratch storage: {0}")]
    Scratch(#[source] io::Error),

    /// Waiting on the child process failed
    #[error("failed to wait for {binary}: {source}")]
    Wait {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TrialError {
    /// Category recorded in the outcome stream.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Launch { .. } => FailureKind::LaunchFailure,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::NonZeroExit { .. } => FailureKind::NonZeroExit,
            Self::RoundTripMismatch { .. } => FailureKind::RoundTripMismatch,
            Self::Input { .. } => FailureKind::InputUnreadable,
            Self::Stream(_) | Self::Wait { .. } => FailureKind::StreamFailure,
            Self::Scratch(_) => FailureKind::ScratchExhausted,
        }
    }

    /// Whether this failure must abort the whole run instead of being recorded.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Scratch(_))
    }
}

/// Errors fatal to a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid tool or run configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration source could not be loaded or parsed
    #[error("failed to load configuration: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Scratch storage exhausted mid-run
    #[error("trial {tool} on {file} (level {level}) aborted the run: {source}")]
    Scratch {
        tool: String,
        file: PathBuf,
        level: Level,
        #[source]
        source: TrialError,
    },
}

/// Result type for fatal benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_scratch_is_fatal() {
        let scratch = TrialError::Scratch(io::Error::new(io::ErrorKind::Other, "no space"));
        assert!(scratch.is_fatal());
        assert_eq!(scratch.kind(), FailureKind::ScratchExhausted);

        let timeout = TrialError::Timeout {
            timeout: Duration::from_secs(1),
        };
        assert!(!timeout.is_fatal());
        assert_eq!(timeout.kind(), FailureKind::Timeout);

        let launch = TrialError::Launch {
            binary: PathBuf::from("/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(!launch.is_fatal());
        assert_eq!(launch.kind(), FailureKind::LaunchFailure);
    }

    #[test]
    fn test_error_display() {
        let err = TrialError::RoundTripMismatch {
            original: 100,
            decompressed: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("not equal"));

        let err = TrialError::Timeout {
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "process did not exit within 1.5s");
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::RoundTripMismatch).unwrap();
        assert_eq!(json, "\"round_trip_mismatch\"");
    }
}
