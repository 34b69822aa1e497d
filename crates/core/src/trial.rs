// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-trial execution.
//!
//! A trial compresses one file with one tool at one level, decompresses the
//! result, and checks that the decompressed size matches the original size.
//! Only sizes are compared; identical-length corruption is not detected.

use crate::error::TrialError;
use crate::invoker::Invoker;
use crate::outcome::RunResult;
use crate::tool::{Level, Tool};
use async_trait::async_trait;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

/// Executes a single (tool, file, level) trial.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrialRunner: Send + Sync {
    /// Run the trial to completion.
    async fn run_trial(&self, tool: &Tool, file: &Path, level: Level)
        -> Result<RunResult, TrialError>;
}

/// Runs trials by launching the tool's binary with scratch files.
#[derive(Debug, Clone)]
pub struct ProcessTrialRunner {
    timeout: Duration,
}

impl ProcessTrialRunner {
    /// Create a runner bounding every process by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Per-process timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Returns the stream length and leaves the cursor at the start.
fn measure_and_rewind(file: &mut File) -> std::io::Result<u64> {
    let len = file.seek(SeekFrom::End(0))?;
    file.rewind()?;
    Ok(len)
}

fn scratch() -> Result<File, TrialError> {
    tempfile::tempfile().map_err(TrialError::Scratch)
}

fn share(file: &File) -> Result<File, TrialError> {
    file.try_clone().map_err(TrialError::Scratch)
}

#[async_trait]
impl TrialRunner for ProcessTrialRunner {
    async fn run_trial(
        &self,
        tool: &Tool,
        file: &Path,
        level: Level,
    ) -> Result<RunResult, TrialError> {
        let input_error = |source| TrialError::Input {
            path: file.to_path_buf(),
            source,
        };
        let mut original = File::open(file).map_err(input_error)?;
        let original_size = measure_and_rewind(&mut original).map_err(input_error)?;

        let invoker = Invoker::new(tool);

        let mut compressed = scratch()?;
        let compression_time = invoker
            .compress(original, share(&compressed)?, level, self.timeout)
            .await?;
        let compressed_size = measure_and_rewind(&mut compressed).map_err(TrialError::Stream)?;

        let mut decompressed = scratch()?;
        let decompression_time = invoker
            .decompress(compressed, share(&decompressed)?, self.timeout)
            .await?;
        let decompressed_size = decompressed
            .seek(SeekFrom::End(0))
            .map_err(TrialError::Stream)?;

        if decompressed_size != original_size {
            return Err(TrialError::RoundTripMismatch {
                original: original_size,
                decompressed: decompressed_size,
            });
        }

        Ok(RunResult {
            tool: tool.name().to_string(),
            file: file.to_path_buf(),
            level,
            compression_time,
            decompression_time,
            original_size,
            compressed_size,
            decompressed_size,
        })
    }
}
