//! Error types for the golden-case harness
//!
//! Mismatches between a fresh artifact and its golden file are not errors;
//! they are reported through [`crate::golden::Verdict`]. Everything here
//! aborts the case it happened in.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, running, or persisting golden cases
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Input violated a structural assumption of the listing or descriptor
    #[error("format error: {0}")]
    Format(String),

    /// Artifact glob matched nothing under the build root
    #[error("no artifact matching '{pattern}' under {root}")]
    ArtifactNotFound { pattern: String, root: PathBuf },

    /// Artifact glob matched more than one file
    #[error("artifact pattern '{pattern}' is ambiguous, {} matches: {}", .candidates.len(), display_paths(.candidates))]
    ArtifactAmbiguous {
        pattern: String,
        candidates: Vec<PathBuf>,
    },

    /// External tool could not be started
    #[error("failed to spawn {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External tool exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", display_code(.code))]
    ToolExecution {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Case descriptor is missing fields or is not valid JSON
    #[error("invalid case descriptor {path}: {message}")]
    Descriptor { path: PathBuf, message: String },

    /// Golden artifact is missing or unreadable
    #[error("golden artifact {path}: {message}")]
    Golden { path: PathBuf, message: String },

    /// Harness configuration could not be parsed or validated
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No descriptor for the requested case id
    #[error("unknown case '{0}'")]
    UnknownCase(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from resolving the configured artifact
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            HarnessError::ArtifactNotFound { .. } | HarnessError::ArtifactAmbiguous { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
