// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! External process invocation.
//!
//! The [`Invoker`] runs a tool's binary with a file as stdin and another file
//! as stdout, and measures wall-clock time from spawn to exit. A process that
//! outlives its timeout is killed and reaped before the call returns.

use crate::error::TrialError;
use crate::tool::{Level, Tool};
use std::fs::File;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Runs compress and decompress commands for one tool.
#[derive(Debug, Clone, Copy)]
pub struct Invoker<'a> {
    tool: &'a Tool,
}

impl<'a> Invoker<'a> {
    /// Wrap a tool.
    pub fn new(tool: &'a Tool) -> Self {
        Self { tool }
    }

    /// The wrapped tool.
    pub fn tool(&self) -> &'a Tool {
        self.tool
    }

    /// Compress `source` into `destination` at `level`.
    pub async fn compress(
        &self,
        source: File,
        destination: File,
        level: Level,
        timeout: Duration,
    ) -> Result<Duration, TrialError> {
        let args = self.tool.compress_command(level);
        self.timed_run(&args, source, destination, timeout).await
    }

    /// Decompress `source` into `destination`.
    pub async fn decompress(
        &self,
        source: File,
        destination: File,
        timeout: Duration,
    ) -> Result<Duration, TrialError> {
        self.timed_run(self.tool.decompress_args(), source, destination, timeout)
            .await
    }

    async fn timed_run(
        &self,
        args: &[String],
        stdin: File,
        stdout: File,
        timeout: Duration,
    ) -> Result<Duration, TrialError> {
        let binary = self.tool.binary();
        let mut command = Command::new(binary);
        command
            .args(args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!(binary = %binary.display(), ?args, "spawning");

        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| TrialError::Launch {
            binary: binary.to_path_buf(),
            source,
        })?;

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => status.map_err(|source| TrialError::Wait {
                binary: binary.to_path_buf(),
                source,
            })?,
            Err(_) => {
                // kill() also reaps the child
                if let Err(error) = child.kill().await {
                    debug!(binary = %binary.display(), %error, "kill after timeout failed");
                }
                return Err(TrialError::Timeout { timeout });
            }
        };
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(TrialError::NonZeroExit { status });
        }

        Ok(elapsed)
    }
}
