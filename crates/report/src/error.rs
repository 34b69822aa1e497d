// Copyright 2025 Compbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing or reading reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem access failed
    #[error("{path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Results could not be serialized or parsed
    #[error("{path}: invalid results JSON: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
