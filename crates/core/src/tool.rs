// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tool definitions.
//!
//! A [`Tool`] is an immutable description of one external compression
//! program: where its binary lives, which levels it supports, and the
//! argument templates used to compress and decompress through stdin/stdout.

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Tool-specific compression level.
pub type Level = i32;

/// Placeholder substituted with the level in compress argument templates.
pub const LEVEL_PLACEHOLDER: &str = "{level}";

/// Substitutes `level` into every template argument containing the placeholder.
///
/// Arguments without the placeholder pass through unchanged, so an empty
/// template yields an empty argument list regardless of `level`.
pub fn build_arguments(template: &[String], level: Level) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            if arg.contains(LEVEL_PLACEHOLDER) {
                arg.replace(LEVEL_PLACEHOLDER, &level.to_string())
            } else {
                arg.clone()
            }
        })
        .collect()
}

/// An external compression program under benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    name: String,
    binary: PathBuf,
    levels: Vec<Level>,
    version_args: Vec<String>,
    compress_args: Vec<String>,
    decompress_args: Vec<String>,
}

impl Tool {
    /// Create a new builder.
    pub fn builder(name: impl Into<String>, binary: impl Into<PathBuf>) -> ToolBuilder {
        ToolBuilder {
            name: name.into(),
            binary: binary.into(),
            levels: Vec::new(),
            version_args: Vec::new(),
            compress_args: Vec::new(),
            decompress_args: Vec::new(),
        }
    }

    /// Display name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Declared levels, in benchmark iteration order. Never empty.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// First declared level, used for warmup.
    pub fn first_level(&self) -> Level {
        // The builder rejects empty level lists.
        self.levels[0]
    }

    /// Arguments passed when probing the version.
    pub fn version_args(&self) -> &[String] {
        &self.version_args
    }

    /// Compress argument template.
    pub fn compress_args(&self) -> &[String] {
        &self.compress_args
    }

    /// Decompress arguments.
    pub fn decompress_args(&self) -> &[String] {
        &self.decompress_args
    }

    /// Whether the compress template actually consumes the level.
    pub fn takes_level(&self) -> bool {
        self.compress_args
            .iter()
            .any(|arg| arg.contains(LEVEL_PLACEHOLDER))
    }

    /// Concrete compress argv (without the binary) for `level`.
    pub fn compress_command(&self, level: Level) -> Vec<String> {
        build_arguments(&self.compress_args, level)
    }

    /// Whether the binary exists on disk.
    pub fn is_installed(&self) -> bool {
        self.binary.exists()
    }
}

/// Builder for [`Tool`].
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    name: String,
    binary: PathBuf,
    levels: Vec<Level>,
    version_args: Vec<String>,
    compress_args: Vec<String>,
    decompress_args: Vec<String>,
}

impl ToolBuilder {
    /// Set the levels in iteration order.
    pub fn levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Set the version probe arguments.
    pub fn version_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.version_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the compress argument template.
    pub fn compress_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compress_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the decompress arguments.
    pub fn decompress_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decompress_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and build the tool.
    pub fn build(self) -> Result<Tool> {
        if self.name.trim().is_empty() {
            return Err(BenchError::Config("tool name must not be empty".to_string()));
        }
        if self.binary.as_os_str().is_empty() {
            return Err(BenchError::Config(format!(
                "tool '{}' has an empty binary path",
                self.name
            )));
        }
        if self.levels.is_empty() {
            return Err(BenchError::Config(format!(
                "tool '{}' declares no compression levels",
                self.name
            )));
        }

        Ok(Tool {
            name: self.name,
            binary: self.binary,
            levels: self.levels,
            version_args: self.version_args,
            compress_args: self.compress_args,
            decompress_args: self.decompress_args,
        })
    }
}

/// Display identity of a tool: its name plus a probed version when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolIdentity {
    /// Tool name.
    pub name: String,
    /// Probed version, if the probe succeeded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    /// Whether the compress template consumes the level.
    pub takes_level: bool,
}

impl ToolIdentity {
    /// Identity without a version.
    pub fn unversioned(tool: &Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            version: None,
            takes_level: tool.takes_level(),
        }
    }

    /// Identity carrying a probed version.
    pub fn with_version(tool: &Tool, version: Option<String>) -> Self {
        Self {
            version,
            ..Self::unversioned(tool)
        }
    }

    /// Version string for display, `unknown` when the probe failed.
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

impl fmt::Display for ToolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} v{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}
