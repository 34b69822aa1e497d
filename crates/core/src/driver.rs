// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark driver.
//!
//! Sweeps files × tools × levels in that nesting order, one trial at a time.
//! Per tool and file the driver runs an unmeasured warmup trial, then the
//! declared levels in order. After the first failing level the tool is
//! unhealthy for the rest of that file and its remaining levels are recorded
//! as skipped without being attempted. Health resets on the next file.

use crate::aggregate::BenchmarkAggregate;
use crate::config::BenchSettings;
use crate::error::{BenchError, Result};
use crate::outcome::{RunError, SkippedRun, TrialOutcome};
use crate::progress::{ProgressSink, TracingProgress, TrialProgress};
use crate::tool::{Level, Tool, ToolIdentity};
use crate::trial::{ProcessTrialRunner, TrialRunner};
use crate::version::{probe_version, DEFAULT_PROBE_TIMEOUT};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Knobs controlling the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Run one unmeasured trial per tool and file before the measured levels.
    pub warmup: bool,
    /// Probe tool versions for display identities.
    pub probe_versions: bool,
    /// Bound on each version probe.
    pub probe_timeout: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            warmup: true,
            probe_versions: true,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Per-(tool, file) health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolHealth {
    Healthy,
    Unhealthy { failed_level: Level },
}

/// Drives the full benchmark sweep.
pub struct BenchmarkDriver<R> {
    tools: Vec<Tool>,
    files: Vec<PathBuf>,
    runner: R,
    options: DriverOptions,
    progress: Box<dyn ProgressSink>,
}

impl BenchmarkDriver<ProcessTrialRunner> {
    /// Driver running real processes as described by `settings`.
    pub fn from_settings(settings: &BenchSettings) -> Result<Self> {
        settings.validate()?;
        let options = DriverOptions {
            warmup: settings.warmup,
            probe_versions: settings.probe_versions,
            ..DriverOptions::default()
        };

        Ok(Self::new(
            settings.registry()?.into_tools(),
            settings.files.clone(),
            ProcessTrialRunner::new(settings.timeout()),
        )
        .with_options(options))
    }
}

impl<R: TrialRunner> BenchmarkDriver<R> {
    /// Create a driver over `tools` and `files`.
    pub fn new(tools: Vec<Tool>, files: Vec<PathBuf>, runner: R) -> Self {
        Self {
            tools,
            files,
            runner,
            options: DriverOptions::default(),
            progress: Box::new(TracingProgress),
        }
    }

    /// Replace the sweep options.
    pub fn with_options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the progress sink.
    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Tools in sweep order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Files in sweep order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Run every (file, tool, level) combination and collect the outcomes.
    ///
    /// Trial failures are recorded, never returned. The only error is a
    /// fatal scratch-resource failure, which ends the run.
    pub async fn run(self) -> Result<BenchmarkAggregate> {
        let Self {
            tools,
            files,
            runner,
            options,
            mut progress,
        } = self;

        let started_at = Utc::now();
        let identities = resolve_identities(&tools, &options).await;

        let mut outcomes = Vec::new();
        for file in &files {
            sweep_file(
                &runner,
                &tools,
                &identities,
                file,
                options.warmup,
                progress.as_mut(),
                &mut outcomes,
            )
            .await?;
        }
        progress.finished();

        let aggregate = BenchmarkAggregate::new(identities, files, outcomes, started_at);
        let counts = aggregate.counts();
        info!(
            completed = counts.completed,
            failed = counts.failed,
            skipped = counts.skipped,
            "benchmark finished"
        );
        Ok(aggregate)
    }
}

async fn resolve_identities(tools: &[Tool], options: &DriverOptions) -> Vec<ToolIdentity> {
    if !options.probe_versions {
        return tools.iter().map(ToolIdentity::unversioned).collect();
    }

    // Variants of one binary share a probe.
    let mut probed: HashMap<(&Path, &[String]), Option<String>> = HashMap::new();
    let mut identities = Vec::with_capacity(tools.len());
    for tool in tools {
        let key = (tool.binary(), tool.version_args());
        let version = match probed.get(&key) {
            Some(version) => version.clone(),
            None => {
                let version = probe_version(tool, options.probe_timeout).await;
                if version.is_none() {
                    debug!(tool = tool.name(), "version unknown");
                }
                probed.insert(key, version.clone());
                version
            }
        };
        identities.push(ToolIdentity::with_version(tool, version));
    }
    identities
}

async fn sweep_file<R: TrialRunner>(
    runner: &R,
    tools: &[Tool],
    identities: &[ToolIdentity],
    file: &Path,
    warmup: bool,
    progress: &mut dyn ProgressSink,
    outcomes: &mut Vec<TrialOutcome>,
) -> Result<()> {
    let total: usize = tools.iter().map(|tool| tool.levels().len()).sum();
    progress.file_started(file, total);

    let mut index = 0;
    for (tool, identity) in tools.iter().zip(identities) {
        let label = identity.to_string();

        if warmup {
            let level = tool.first_level();
            progress.warmup(&label, level, file);
            if let Err(error) = runner.run_trial(tool, file, level).await {
                debug!(tool = tool.name(), level, %error, "warmup run failed");
            }
        }

        let mut health = ToolHealth::Healthy;
        for &level in tool.levels() {
            index += 1;
            let step = TrialProgress {
                identity: &label,
                level,
                file,
                index,
                total,
            };

            let outcome = match health {
                ToolHealth::Unhealthy { failed_level } => TrialOutcome::Skipped(SkippedRun {
                    tool: tool.name().to_string(),
                    file: file.to_path_buf(),
                    level,
                    failed_level,
                }),
                ToolHealth::Healthy => {
                    progress.trial_started(&step);
                    match runner.run_trial(tool, file, level).await {
                        Ok(result) => TrialOutcome::Completed(result),
                        Err(error) if error.is_fatal() => {
                            return Err(BenchError::Scratch {
                                tool: tool.name().to_string(),
                                file: file.to_path_buf(),
                                level,
                                source: error,
                            });
                        }
                        Err(error) => {
                            health = ToolHealth::Unhealthy {
                                failed_level: level,
                            };
                            TrialOutcome::Failed(RunError::from_trial_error(
                                tool.name(),
                                file,
                                level,
                                &error,
                            ))
                        }
                    }
                }
            };

            progress.trial_finished(&step, &outcome);
            outcomes.push(outcome);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, TrialError};
    use crate::outcome::RunResult;
    use crate::progress::SilentProgress;
    use crate::trial::MockTrialRunner;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn tool(name: &str, levels: &[Level]) -> Tool {
        Tool::builder(name, format!("/usr/bin/{}", name))
            .levels(levels.iter().copied())
            .compress_args(["-{level}"])
            .decompress_args(["-d"])
            .build()
            .unwrap()
    }

    fn measured(tool: &Tool, file: &Path, level: Level) -> RunResult {
        RunResult {
            tool: tool.name().to_string(),
            file: file.to_path_buf(),
            level,
            compression_time: Duration::from_millis(3),
            decompression_time: Duration::from_millis(1),
            original_size: 64,
            compressed_size: 16,
            decompressed_size: 64,
        }
    }

    fn no_probe() -> DriverOptions {
        DriverOptions {
            probe_versions: false,
            ..DriverOptions::default()
        }
    }

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn statuses(outcomes: &[TrialOutcome]) -> Vec<&'static str> {
        outcomes
            .iter()
            .map(|o| match o {
                TrialOutcome::Completed(_) => "completed",
                TrialOutcome::Failed(_) => "failed",
                TrialOutcome::Skipped(_) => "skipped",
            })
            .collect()
    }

    #[tokio::test]
    async fn test_every_level_yields_one_outcome() {
        let mut runner = MockTrialRunner::new();
        // (1 warmup + 3 levels) * 2 files
        runner
            .expect_run_trial()
            .times(8)
            .returning(|tool: &Tool, file: &Path, level: Level| Ok(measured(tool, file, level)));

        let aggregate = BenchmarkDriver::new(
            vec![tool("gzip", &[1, 2, 3])],
            files(&["a.bin", "b.bin"]),
            runner,
        )
        .with_options(no_probe())
        .with_progress(SilentProgress)
        .run()
        .await
        .unwrap();

        assert_eq!(aggregate.outcomes().len(), 6);
        assert!(aggregate.outcomes().iter().all(TrialOutcome::is_successful));
        for file in aggregate.files() {
            assert_eq!(aggregate.for_tool_on_file("gzip", file).count(), 3);
        }
    }

    #[tokio::test]
    async fn test_failure_skips_remaining_levels_for_file() {
        let mut runner = MockTrialRunner::new();
        // Warmup and level 1 pass, level 2 fails, level 3 is never attempted.
        runner
            .expect_run_trial()
            .times(3)
            .returning(|tool: &Tool, file: &Path, level: Level| {
                if level == 2 {
                    Err(TrialError::Timeout {
                        timeout: Duration::from_secs(1),
                    })
                } else {
                    Ok(measured(tool, file, level))
                }
            });

        let aggregate =
            BenchmarkDriver::new(vec![tool("xz", &[1, 2, 3, 4])], files(&["a.bin"]), runner)
                .with_options(no_probe())
                .with_progress(SilentProgress)
                .run()
                .await
                .unwrap();

        assert_eq!(
            statuses(aggregate.outcomes()),
            vec!["completed", "failed", "skipped", "skipped"]
        );

        let error = aggregate.outcomes()[1].as_error().unwrap();
        assert_eq!(error.kind, FailureKind::Timeout);

        match &aggregate.outcomes()[3] {
            TrialOutcome::Skipped(skipped) => {
                assert_eq!(skipped.level, 4);
                assert_eq!(skipped.failed_level, 2);
            }
            other => panic!("expected skipped outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health_resets_per_file() {
        let calls: Arc<Mutex<Vec<(PathBuf, Level)>>> = Arc::default();
        let seen = Arc::clone(&calls);

        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .returning(move |tool: &Tool, file: &Path, level: Level| {
                seen.lock().unwrap().push((file.to_path_buf(), level));
                if file == Path::new("bad.bin") {
                    Err(TrialError::NonZeroExit {
                        status: exit_status(1),
                    })
                } else {
                    Ok(measured(tool, file, level))
                }
            });

        let aggregate = BenchmarkDriver::new(
            vec![tool("lz4", &[1, 2, 3])],
            files(&["bad.bin", "good.bin"]),
            runner,
        )
        .with_options(no_probe())
        .with_progress(SilentProgress)
        .run()
        .await
        .unwrap();

        assert_eq!(
            statuses(aggregate.outcomes()),
            vec!["failed", "skipped", "skipped", "completed", "completed", "completed"]
        );

        // bad.bin: warmup + level 1 only; good.bin: warmup + all levels.
        let calls = calls.lock().unwrap();
        let bad_calls = calls.iter().filter(|(f, _)| f == Path::new("bad.bin")).count();
        let good_calls = calls.iter().filter(|(f, _)| f == Path::new("good.bin")).count();
        assert_eq!(bad_calls, 2);
        assert_eq!(good_calls, 4);
    }

    #[tokio::test]
    async fn test_warmup_failure_is_invisible() {
        let mut calls = 0;
        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .times(3)
            .returning(move |tool: &Tool, file: &Path, level: Level| {
                calls += 1;
                if calls == 1 {
                    Err(TrialError::Launch {
                        binary: tool.binary().to_path_buf(),
                        source: io::Error::new(io::ErrorKind::Other, "cold start"),
                    })
                } else {
                    Ok(measured(tool, file, level))
                }
            });

        let aggregate =
            BenchmarkDriver::new(vec![tool("zstd", &[1, 2])], files(&["a.bin"]), runner)
                .with_options(no_probe())
                .with_progress(SilentProgress)
                .run()
                .await
                .unwrap();

        assert_eq!(statuses(aggregate.outcomes()), vec!["completed", "completed"]);
    }

    #[tokio::test]
    async fn test_warmup_can_be_disabled() {
        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .times(2)
            .returning(|tool: &Tool, file: &Path, level: Level| Ok(measured(tool, file, level)));

        let options = DriverOptions {
            warmup: false,
            ..no_probe()
        };
        let aggregate =
            BenchmarkDriver::new(vec![tool("bzip2", &[1, 9])], files(&["a.bin"]), runner)
                .with_options(options)
                .with_progress(SilentProgress)
                .run()
                .await
                .unwrap();

        assert_eq!(aggregate.outcomes().len(), 2);
    }

    #[tokio::test]
    async fn test_scratch_exhaustion_aborts_run() {
        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .returning(|_tool: &Tool, _file: &Path, _level: Level| {
                Err(TrialError::Scratch(io::Error::new(
                    io::ErrorKind::Other,
                    "no space left on device",
                )))
            });

        let result = BenchmarkDriver::new(vec![tool("gzip", &[1, 2])], files(&["a.bin"]), runner)
            .with_options(no_probe())
            .with_progress(SilentProgress)
            .run()
            .await;

        match result {
            Err(BenchError::Scratch { tool, level, .. }) => {
                assert_eq!(tool, "gzip");
                assert_eq!(level, 1);
            }
            other => panic!("expected scratch error, got {:?}", other.map(|a| a.counts())),
        }
    }

    #[tokio::test]
    async fn test_iteration_order_files_tools_levels() {
        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .returning(|tool: &Tool, file: &Path, level: Level| Ok(measured(tool, file, level)));

        let aggregate = BenchmarkDriver::new(
            vec![tool("gzip", &[2, 1]), tool("xz", &[5])],
            files(&["a.bin", "b.bin"]),
            runner,
        )
        .with_options(no_probe())
        .with_progress(SilentProgress)
        .run()
        .await
        .unwrap();

        let order: Vec<(String, &str, Level)> = aggregate
            .outcomes()
            .iter()
            .map(|o| (o.file().display().to_string(), o.tool(), o.level()))
            .collect();

        assert_eq!(
            order,
            vec![
                ("a.bin".to_string(), "gzip", 2),
                ("a.bin".to_string(), "gzip", 1),
                ("a.bin".to_string(), "xz", 5),
                ("b.bin".to_string(), "gzip", 2),
                ("b.bin".to_string(), "gzip", 1),
                ("b.bin".to_string(), "xz", 5),
            ]
        );
    }

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl ProgressSink for Recorder {
        fn file_started(&mut self, file: &Path, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("file {} {}", file.display(), total));
        }

        fn trial_finished(&mut self, progress: &TrialProgress<'_>, outcome: &TrialOutcome) {
            self.events.lock().unwrap().push(format!(
                "{}/{} {}",
                progress.index,
                progress.total,
                outcome.is_successful()
            ));
        }
    }

    #[tokio::test]
    async fn test_progress_counts_per_file() {
        let mut runner = MockTrialRunner::new();
        runner
            .expect_run_trial()
            .returning(|tool: &Tool, file: &Path, level: Level| {
                if tool.name() == "xz" {
                    Err(TrialError::Timeout {
                        timeout: Duration::from_secs(1),
                    })
                } else {
                    Ok(measured(tool, file, level))
                }
            });

        let recorder = Recorder::default();
        let events = Arc::clone(&recorder.events);

        BenchmarkDriver::new(
            vec![tool("gzip", &[1]), tool("xz", &[1, 2])],
            files(&["a.bin", "b.bin"]),
            runner,
        )
        .with_options(no_probe())
        .with_progress(recorder)
        .run()
        .await
        .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "file a.bin 3",
                "1/3 true",
                "2/3 false",
                "3/3 false",
                "file b.bin 3",
                "1/3 true",
                "2/3 false",
                "3/3 false",
            ]
        );
    }

    #[cfg(unix)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(not(unix))]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}
