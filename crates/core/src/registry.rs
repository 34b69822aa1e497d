// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tool registry.
//!
//! The registry is an ordered, read-only list of tools. Order matters: it is
//! the order in which tools are benchmarked and reported.

use crate::error::{BenchError, Result};
use crate::tool::{Level, Tool};
use std::collections::HashSet;

/// Inclusive range of levels, `from..=to`.
pub fn level_range(from: Level, to: Level) -> Vec<Level> {
    (from..=to).collect()
}

/// Ordered collection of tools with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(tools: Vec<Tool>) -> Result<Self> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name()) {
                return Err(BenchError::Config(format!(
                    "duplicate tool name '{}'",
                    tool.name()
                )));
            }
        }
        Ok(Self { tools })
    }

    /// The default tool table, all binaries under `/usr/bin`.
    pub fn builtin() -> Self {
        Self {
            tools: builtin_tools(),
        }
    }

    /// Tools in declaration order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Consume the registry.
    pub fn into_tools(self) -> Vec<Tool> {
        self.tools
    }

    /// Tool names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Keep only the named tools, preserving registry order.
    pub fn filter<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        for name in names {
            if self.get(name.as_ref()).is_none() {
                return Err(BenchError::Config(format!(
                    "unknown tool '{}' (available: {})",
                    name.as_ref(),
                    self.names().join(", ")
                )));
            }
        }

        let tools = self
            .tools
            .iter()
            .filter(|tool| names.iter().any(|n| n.as_ref() == tool.name()))
            .cloned()
            .collect();
        Ok(Self { tools })
    }

    /// Keep only tools whose binary exists.
    pub fn installed(&self) -> Self {
        Self {
            tools: self
                .tools
                .iter()
                .filter(|tool| tool.is_installed())
                .cloned()
                .collect(),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn standard(name: &str, binary: &str, levels: Vec<Level>, compress: &[&str]) -> Tool {
    standard_with_version(name, binary, levels, &["--version"], compress)
}

fn standard_with_version(
    name: &str,
    binary: &str,
    levels: Vec<Level>,
    version: &[&str],
    compress: &[&str],
) -> Tool {
    Tool::builder(name, binary)
        .levels(levels)
        .version_args(version.iter().copied())
        .compress_args(compress.iter().copied())
        .decompress_args(["-d"])
        .build()
        .unwrap_or_else(|e| unreachable!("builtin tool '{}' is invalid: {}", name, e))
}

fn builtin_tools() -> Vec<Tool> {
    let cat = Tool::builder("cat", "/usr/bin/cat")
        .levels([0])
        .version_args(["--version"])
        .build()
        .unwrap_or_else(|e| unreachable!("builtin tool 'cat' is invalid: {}", e));

    let mut zstd_fast = level_range(1, 19);
    zstd_fast.extend([50, 100, 1000]);

    vec![
        cat,
        standard("brotli", "/usr/bin/brotli", level_range(0, 11), &["--quality={level}"]),
        standard(
            "brotli (long)",
            "/usr/bin/brotli",
            level_range(0, 11),
            &["--quality={level}", "--lgwin=24"],
        ),
        standard_with_version(
            "bzip2",
            "/usr/bin/bzip2",
            level_range(1, 9),
            &["--version", "--help"],
            &["-{level}"],
        ),
        standard("gzip", "/usr/bin/gzip", level_range(1, 9), &["-{level}"]),
        standard("lizard", "/usr/bin/lizard", level_range(10, 49), &["-{level}"]),
        standard("lz4", "/usr/bin/lz4", level_range(1, 12), &["-{level}"]),
        standard_with_version("lzf", "/usr/bin/lzf", level_range(1, 12), &["--help"], &[]),
        standard("lzma", "/usr/bin/lzma", level_range(1, 9), &["-{level}"]),
        standard("lzop", "/usr/bin/lzop", level_range(1, 9), &["-{level}"]),
        standard_with_version(
            "lzturbo",
            "/usr/bin/lzturbo",
            vec![10, 11, 12, 19, 20, 21, 22, 29, 30, 31, 32, 39, 49],
            &["--help"],
            &["-{level}"],
        ),
        standard("xz", "/usr/bin/xz", level_range(1, 9), &["-{level}"]),
        standard("zstd", "/usr/bin/zstd", level_range(1, 19), &["-{level}"]),
        standard(
            "zstd (long)",
            "/usr/bin/zstd",
            level_range(1, 19),
            &["-{level}", "--long"],
        ),
        standard(
            "zstd (ultra)",
            "/usr/bin/zstd",
            level_range(1, 22),
            &["-{level}", "--long", "--ultra"],
        ),
        standard("zstd (fast)", "/usr/bin/zstd", zstd_fast, &["--fast={level}"]),
    ]
}
