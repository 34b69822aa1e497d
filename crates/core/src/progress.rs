// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator-facing progress notifications.
//!
//! Sinks observe the sweep; they receive shared references only and cannot
//! influence which trials run or what they produce.

use crate::outcome::TrialOutcome;
use crate::tool::Level;
use std::path::Path;
use tracing::{debug, info, warn};

/// Position of a trial within the current file's sweep.
#[derive(Debug, Clone, Copy)]
pub struct TrialProgress<'a> {
    /// Tool display identity.
    pub identity: &'a str,
    /// Level under test.
    pub level: Level,
    /// Input file.
    pub file: &'a Path,
    /// 1-based index within the current file.
    pub index: usize,
    /// Number of (tool, level) combinations for the current file.
    pub total: usize,
}

impl TrialProgress<'_> {
    /// `[identity (level)]: file [test n/total]`
    pub fn label(&self) -> String {
        format!(
            "[{} ({})]: {} [test {}/{}]",
            self.identity,
            self.level,
            self.file.display(),
            self.index,
            self.total
        )
    }
}

/// Receives progress notifications from the driver.
pub trait ProgressSink: Send {
    /// A file's sweep is about to start.
    fn file_started(&mut self, _file: &Path, _total: usize) {}

    /// An unmeasured warmup trial is about to run.
    fn warmup(&mut self, _identity: &str, _level: Level, _file: &Path) {}

    /// A measured trial is about to run.
    fn trial_started(&mut self, _progress: &TrialProgress<'_>) {}

    /// A trial finished, or was skipped.
    fn trial_finished(&mut self, _progress: &TrialProgress<'_>, _outcome: &TrialOutcome) {}

    /// The whole sweep is done.
    fn finished(&mut self) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn file_started(&mut self, file: &Path, total: usize) {
        info!(file = %file.display(), trials = total, "benchmarking file");
    }

    fn warmup(&mut self, identity: &str, level: Level, file: &Path) {
        debug!("[{} ({})]: {} [warmup run]", identity, level, file.display());
    }

    fn trial_started(&mut self, progress: &TrialProgress<'_>) {
        info!("{}", progress.label());
    }

    fn trial_finished(&mut self, progress: &TrialProgress<'_>, outcome: &TrialOutcome) {
        match outcome {
            TrialOutcome::Completed(result) => debug!(
                ratio = result.ratio(),
                compression_secs = result.compression_time.as_secs_f64(),
                decompression_secs = result.decompression_time.as_secs_f64(),
                "{} [OK]",
                progress.label()
            ),
            TrialOutcome::Failed(error) => {
                warn!(kind = %error.kind, "{} [FAILED] {}", progress.label(), error.reason)
            }
            TrialOutcome::Skipped(_) => info!("{} [SKIPPED]", progress.label()),
        }
    }
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {}
