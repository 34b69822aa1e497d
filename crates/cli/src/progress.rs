// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Terminal progress bar.

use colored::Colorize;
use compbench_core::{Level, ProgressSink, TrialOutcome, TrialProgress};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const TEMPLATE: &str = "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress sink drawing one bar per file.
#[derive(Debug)]
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Create a hidden bar; it is sized when the first file starts.
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn file_started(&mut self, file: &Path, total: usize) {
        self.bar.reset();
        self.bar.set_length(total as u64);
        self.bar.set_prefix(file.display().to_string());
    }

    fn warmup(&mut self, identity: &str, level: Level, _file: &Path) {
        self.bar
            .set_message(format!("{} ({}) warmup", identity, level));
    }

    fn trial_started(&mut self, progress: &TrialProgress<'_>) {
        self.bar
            .set_message(format!("{} ({})", progress.identity, progress.level));
    }

    fn trial_finished(&mut self, progress: &TrialProgress<'_>, outcome: &TrialOutcome) {
        self.bar.inc(1);
        if let TrialOutcome::Failed(error) = outcome {
            self.bar.println(format!(
                "{} {} {}",
                "✗".red().bold(),
                progress.label(),
                error.reason
            ));
        }
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}
