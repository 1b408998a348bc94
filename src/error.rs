//! Error types for audit operations.
//!
//! This module defines [`CompatError`], the error type for the failures that
//! abort an operation outright, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Missing or ambiguous compatibility evidence is never an error: it is a
//!   failed [`EvidenceRecord`](crate::evidence::EvidenceRecord)
//! - `CompatError` covers collaborator and I/O failures
//! - Use `anyhow::Error` (via `CompatError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for audit operations.
#[derive(Debug, Error)]
pub enum CompatError {
    /// The toolchain version command could not be run or exited non-zero.
    #[error("{command} --version failed:\n{output}")]
    ToolchainQuery { command: String, output: String },

    /// No `major.minor[.patch]` pattern in the given text.
    #[error("Could not parse version from: {text:?}")]
    VersionParse { text: String },

    /// `git describe` failed for a framework checkout.
    #[error("git describe failed for {}:\n{output}", path.display())]
    RevisionDescribe { path: PathBuf, output: String },

    /// The evidence report could not be persisted.
    #[error("Failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Exit code for a report that could not be persisted.
pub const EXIT_REPORT_WRITE: i32 = 3;

impl CompatError {
    /// Process exit code when this error aborts a command.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReportWrite { .. } => EXIT_REPORT_WRITE,
            _ => 1,
        }
    }
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, CompatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolchain_query_displays_command_and_output() {
        let err = CompatError::ToolchainQuery {
            command: "idf.py".into(),
            output: "command not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("idf.py --version failed:"));
        assert!(msg.contains("command not found"));
    }

    #[test]
    fn version_parse_quotes_text() {
        let err = CompatError::VersionParse {
            text: "no digits here".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not parse version from: \"no digits here\""
        );
    }

    #[test]
    fn revision_describe_displays_path() {
        let err = CompatError::RevisionDescribe {
            path: PathBuf::from("/opt/esp-adf"),
            output: "fatal: not a git repository".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/esp-adf"));
        assert!(msg.contains("not a git repository"));
    }

    #[test]
    fn report_write_has_distinct_exit_code() {
        let err = CompatError::ReportWrite {
            path: PathBuf::from("/ro/build/report.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(err.exit_code(), EXIT_REPORT_WRITE);

        let err = CompatError::VersionParse { text: "x".into() };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CompatError = io_err.into();
        assert!(matches!(err, CompatError::Io(_)));
    }
}
