// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The complete, read-only result of a benchmark run.

use crate::outcome::{RunError, RunResult, TrialOutcome};
use crate::tool::ToolIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All outcomes of one run plus the tools and files that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkAggregate {
    tools: Vec<ToolIdentity>,
    files: Vec<PathBuf>,
    outcomes: Vec<TrialOutcome>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl BenchmarkAggregate {
    /// Wrap a finished outcome stream.
    pub fn new(
        tools: Vec<ToolIdentity>,
        files: Vec<PathBuf>,
        outcomes: Vec<TrialOutcome>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tools,
            files,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Tool identities in benchmark order.
    pub fn tools(&self) -> &[ToolIdentity] {
        &self.tools
    }

    /// Identity of the named tool.
    pub fn identity(&self, tool: &str) -> Option<&ToolIdentity> {
        self.tools.iter().find(|identity| identity.name == tool)
    }

    /// Input files in benchmark order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Every outcome in emission order.
    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    /// When the run started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the run finished.
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Outcomes for one file.
    pub fn for_file<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a TrialOutcome> + 'a {
        self.outcomes.iter().filter(move |o| o.file() == file)
    }

    /// Outcomes for one tool on one file.
    pub fn for_tool_on_file<'a>(
        &'a self,
        tool: &'a str,
        file: &'a Path,
    ) -> impl Iterator<Item = &'a TrialOutcome> + 'a {
        self.for_file(file).filter(move |o| o.tool() == tool)
    }

    /// Successful measurements across all files.
    pub fn successful(&self) -> impl Iterator<Item = &RunResult> {
        self.outcomes.iter().filter_map(TrialOutcome::as_result)
    }

    /// Successful measurements for one file.
    pub fn successful_for_file<'a>(
        &'a self,
        file: &'a Path,
    ) -> impl Iterator<Item = &'a RunResult> + 'a {
        self.for_file(file).filter_map(TrialOutcome::as_result)
    }

    /// Failed trials across all files.
    pub fn failures(&self) -> impl Iterator<Item = &RunError> {
        self.outcomes.iter().filter_map(TrialOutcome::as_error)
    }

    /// Outcome counts.
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for outcome in &self.outcomes {
            match outcome {
                TrialOutcome::Completed(_) => counts.completed += 1,
                TrialOutcome::Failed(_) => counts.failed += 1,
                TrialOutcome::Skipped(_) => counts.skipped += 1,
            }
        }
        counts
    }
}

/// Number of outcomes per arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Trials that produced a measurement.
    pub completed: usize,
    /// Trials that were attempted and failed.
    pub failed: usize,
    /// Trials skipped after an earlier failure.
    pub skipped: usize,
}

impl OutcomeCounts {
    /// Total outcomes.
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.skipped
    }
}
