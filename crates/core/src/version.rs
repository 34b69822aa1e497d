// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort tool version discovery.

use crate::tool::Tool;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default bound on a version probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("version pattern is valid"));

/// Returns the first `major.minor[.patch]` occurrence in `output`.
pub fn parse_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Runs the tool's version arguments and parses the combined output.
///
/// A non-zero exit still has its output parsed, since several tools print
/// their version from `--help` and exit unsuccessfully. Launch failures,
/// timeouts and unparseable output all yield `None`.
pub async fn probe_version(tool: &Tool, timeout: Duration) -> Option<String> {
    let child = Command::new(tool.binary())
        .args(tool.version_args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(error) => {
            debug!(tool = tool.name(), %error, "version probe failed to launch");
            return None;
        }
    };

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(error)) => {
            debug!(tool = tool.name(), %error, "version probe failed");
            return None;
        }
        Err(_) => {
            debug!(tool = tool.name(), "version probe timed out");
            return None;
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    let version = parse_version(&text);
    if version.is_none() {
        debug!(tool = tool.name(), "no version found in probe output");
    }
    version
}
