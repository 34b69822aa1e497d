// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for compbench.
//!
//! This crate provides the `compbench` command: `run` benchmarks the
//! configured tools over the corpus, `tools` lists the tool registry, and
//! `report` re-renders reports from saved results.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod progress;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use compbench_core::version::{probe_version, DEFAULT_PROBE_TIMEOUT};
use compbench_core::{
    BenchSettings, BenchmarkDriver, DriverOptions, Level, ProcessTrialRunner, ToolRegistry,
    TracingProgress,
};
use compbench_report::{io as report_io, text};
use progress::BarProgress;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// compbench CLI.
#[derive(Parser, Debug)]
#[command(name = "compbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark every tool over every file at every level.
    ///
    /// Writes to the output directory:
    /// - results.json - Raw outcomes, readable by `compbench report`
    /// - report.md - Markdown tables per file
    /// - report.txt - Aligned text tables per file
    /// - <file>_ttr.json, <file>_ttt.json - Scatter series per file
    Run(RunArgs),

    /// List the tool registry.
    Tools {
        /// Configuration file (default: compbench.toml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Probe and show tool versions.
        #[arg(long)]
        versions: bool,
    },

    /// Re-render reports from a saved results.json.
    Report {
        /// Saved results file.
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (default: the directory holding the input).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments of `compbench run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Files to benchmark (default: the configured corpus).
    pub files: Vec<PathBuf>,

    /// Configuration file (default: compbench.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory override.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-process timeout in seconds.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Only benchmark the named tool (repeatable).
    #[arg(long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Skip the unmeasured warmup run.
    #[arg(long)]
    pub no_warmup: bool,

    /// Do not probe tool versions.
    #[arg(long)]
    pub no_versions: bool,

    /// Show a progress bar instead of per-trial log lines.
    #[arg(long)]
    pub progress: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut BenchSettings) {
        if !self.files.is_empty() {
            settings.files = self.files.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = timeout;
        }
        if self.no_warmup {
            settings.warmup = false;
        }
        if self.no_versions {
            settings.probe_versions = false;
        }
    }

    /// The registry restricted to `--tool` names, if any were given.
    pub fn registry(&self, settings: &BenchSettings) -> compbench_core::Result<ToolRegistry> {
        let registry = settings.registry()?;
        if self.tools.is_empty() {
            Ok(registry)
        } else {
            registry.filter(self.tools.as_slice())
        }
    }
}

/// Render levels compactly, collapsing consecutive runs: `1-19, 50, 100`.
pub fn format_levels(levels: &[Level]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < levels.len() {
        let start = levels[i];
        let mut end = start;
        while i + 1 < levels.len() && levels[i + 1] == end + 1 {
            i += 1;
            end = levels[i];
        }
        parts.push(if start == end {
            start.to_string()
        } else {
            format!("{}-{}", start, end)
        });
        i += 1;
    }
    parts.join(", ")
}

fn init_logging(verbose: bool, quiet: bool, json: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "compbench_core={0},compbench_report={0},compbench_cli={0}",
            level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Ignore the error when a subscriber is already installed.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let quiet = matches!(&cli.command, Commands::Run(args) if args.progress);
    init_logging(cli.verbose, quiet, cli.log_json);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(execute(cli.command))
}

/// Execute a parsed command.
pub async fn execute(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run_benchmark(args).await,
        Commands::Tools { config, versions } => list_tools(config.as_deref(), versions).await,
        Commands::Report { input, output } => rerender(&input, output.as_deref()),
    }
}

async fn run_benchmark(args: RunArgs) -> anyhow::Result<()> {
    let mut settings =
        BenchSettings::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut settings);
    settings.validate()?;

    let registry = args.registry(&settings)?;
    info!(
        tools = registry.len(),
        files = settings.files.len(),
        timeout_secs = settings.timeout_secs,
        "starting benchmark"
    );

    let driver = BenchmarkDriver::new(
        registry.into_tools(),
        settings.files.clone(),
        ProcessTrialRunner::new(settings.timeout()),
    )
    .with_options(DriverOptions {
        warmup: settings.warmup,
        probe_versions: settings.probe_versions,
        ..DriverOptions::default()
    });
    let driver = if args.progress {
        driver.with_progress(BarProgress::new())
    } else {
        driver.with_progress(TracingProgress)
    };

    let started = Instant::now();
    let aggregate = driver.run().await.context("benchmark aborted")?;

    let written = report_io::write_all_outputs(&aggregate, &settings.output_dir)
        .context("failed to write reports")?;

    println!("{}", text::console_summary(&aggregate));
    println!(
        "{} Benchmark finished in {:.1}s, {} report files written to {}",
        "✓".green().bold(),
        started.elapsed().as_secs_f64(),
        written.len(),
        settings.output_dir.display()
    );

    Ok(())
}

async fn list_tools(config: Option<&Path>, versions: bool) -> anyhow::Result<()> {
    let settings = BenchSettings::load(config).context("failed to load configuration")?;
    let registry = settings.registry()?;

    for tool in registry.tools() {
        let status = if tool.is_installed() {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };

        let mut line = format!(
            "{} {} [{}] {}",
            status,
            tool.name().bold(),
            format_levels(tool.levels()),
            tool.binary().display()
        );
        if versions {
            let version = probe_version(tool, DEFAULT_PROBE_TIMEOUT).await;
            line.push_str(&format!(" v{}", version.as_deref().unwrap_or("unknown")));
        }
        println!("{}", line);
    }

    let installed = registry.installed().len();
    println!("\n{} of {} tools installed", installed, registry.len());
    Ok(())
}

fn rerender(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let aggregate = report_io::read_results_json(input)?;
    let dir = output
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(report_io::OUTPUT_DIR));

    let written = report_io::write_all_outputs(&aggregate, &dir)?;
    println!("{}", text::console_summary(&aggregate));
    println!(
        "{} {} report files written to {}",
        "✓".green().bold(),
        written.len(),
        dir.display()
    );
    Ok(())
}
