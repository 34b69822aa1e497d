// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `COMPBENCH_`-prefixed environment variables. Callers apply command-line
//! overrides on the returned [`BenchSettings`].
//!
//! # Example file
//!
//! ```toml
//! timeout_secs = 120
//! output_dir = "results"
//! files = ["corpus/history.json", "corpus/empty.bin"]
//!
//! [[tools]]
//! name = "zstd"
//! binary = "/usr/bin/zstd"
//! levels = { from = 1, to = 19 }
//! version_args = ["--version"]
//! compress_args = ["-{level}"]
//! decompress_args = ["-d"]
//! ```

use crate::error::{BenchError, Result};
use crate::registry::{level_range, ToolRegistry};
use crate::tool::{Level, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "COMPBENCH";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "compbench.toml";

/// Default per-process timeout: ten minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10 * 60;

/// Sample corpus used when no files are configured.
pub const DEFAULT_CORPUS: &[&str] = &[
    "corpus/database.sql",
    "corpus/database.csv",
    "corpus/history.json",
    "corpus/empty.bin",
    "corpus/random.bin",
];

/// Levels as written in configuration: a list or an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// Explicit levels in iteration order.
    List(Vec<Level>),
    /// Inclusive range.
    Range {
        /// First level.
        from: Level,
        /// Last level, inclusive.
        to: Level,
    },
}

impl LevelSpec {
    /// Expand into the ordered level list.
    pub fn expand(&self) -> Vec<Level> {
        match self {
            Self::List(levels) => levels.clone(),
            Self::Range { from, to } => level_range(*from, *to),
        }
    }
}

/// A tool entry in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique display name.
    pub name: String,
    /// Executable path.
    pub binary: PathBuf,
    /// Levels to benchmark.
    pub levels: LevelSpec,
    /// Version probe arguments.
    #[serde(default)]
    pub version_args: Vec<String>,
    /// Compress template; `{level}` is substituted.
    #[serde(default)]
    pub compress_args: Vec<String>,
    /// Decompress arguments.
    #[serde(default)]
    pub decompress_args: Vec<String>,
}

impl TryFrom<ToolSpec> for Tool {
    type Error = BenchError;

    fn try_from(entry: ToolSpec) -> Result<Self> {
        Tool::builder(entry.name, entry.binary)
            .levels(entry.levels.expand())
            .version_args(entry.version_args)
            .compress_args(entry.compress_args)
            .decompress_args(entry.decompress_args)
            .build()
    }
}

/// Fully resolved benchmark settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchSettings {
    /// Per-process timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Run an unmeasured warmup trial per tool and file.
    #[serde(default = "default_true")]
    pub warmup: bool,
    /// Probe tool versions for display.
    #[serde(default = "default_true")]
    pub probe_versions: bool,
    /// Directory receiving reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Input files in benchmark order.
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,
    /// Tool table; empty means the built-in registry.
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_files() -> Vec<PathBuf> {
    DEFAULT_CORPUS.iter().map(PathBuf::from).collect()
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            warmup: true,
            probe_versions: true,
            output_dir: default_output_dir(),
            files: default_files(),
            tools: Vec::new(),
        }
    }
}

impl BenchSettings {
    /// Load settings from an optional file plus the environment.
    ///
    /// With `path == None`, `compbench.toml` in the working directory is used
    /// if it exists. An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                builder = builder.add_source(
                    config::File::with_name(DEFAULT_CONFIG_FILE)
                        .format(config::FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let settings: BenchSettings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, without environment overrides.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: BenchSettings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(BenchError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        // Builds every tool, surfacing empty levels and duplicate names.
        self.registry().map(|_| ())
    }

    /// Per-process timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured tool registry, or the built-in one when none is configured.
    pub fn registry(&self) -> Result<ToolRegistry> {
        if self.tools.is_empty() {
            return Ok(ToolRegistry::builtin());
        }

        let tools = self
            .tools
            .iter()
            .cloned()
            .map(Tool::try_from)
            .collect::<Result<Vec<_>>>()?;
        ToolRegistry::new(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BenchSettings::default();
        assert_eq!(settings.timeout(), Duration::from_secs(600));
        assert!(settings.warmup);
        assert!(settings.probe_versions);
        assert_eq!(settings.files.len(), DEFAULT_CORPUS.len());
        assert_eq!(settings.registry().unwrap().len(), 16);
    }

    #[test]
    fn test_parse_tools_from_toml() {
        let text = r#"
            timeout_secs = 30
            files = ["a.bin"]

            [[tools]]
            name = "gzip"
            binary = "/usr/bin/gzip"
            levels = { from = 1, to = 3 }
            compress_args = ["-{level}"]
            decompress_args = ["-d"]

            [[tools]]
            name = "lzturbo"
            binary = "/usr/bin/lzturbo"
            levels = [19, 10]
            compress_args = ["-{level}"]
        "#;

        let settings = BenchSettings::from_toml_str(text).unwrap();
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.files, vec![PathBuf::from("a.bin")]);
        assert_eq!(settings.output_dir, PathBuf::from("results"));

        let registry = settings.registry().unwrap();
        assert_eq!(registry.names(), vec!["gzip", "lzturbo"]);
        assert_eq!(registry.get("gzip").unwrap().levels(), &[1, 2, 3]);
        assert_eq!(registry.get("lzturbo").unwrap().levels(), &[19, 10]);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = BenchSettings::from_toml_str("timeout_secs = 0").unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_empty_levels_rejected() {
        let text = r#"
            [[tools]]
            name = "broken"
            binary = "/usr/bin/broken"
            levels = []
        "#;
        assert!(BenchSettings::from_toml_str(text).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = BenchSettings::load(Some(Path::new("/nonexistent/compbench.toml")));
        assert!(matches!(result, Err(BenchError::ConfigSource(_))));
    }
}
