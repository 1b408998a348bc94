//! Compatibility evidence.
//!
//! Each framework publishes its toolchain support in one of two shapes:
//!
//! - [`table`] - a human-oriented support matrix inside `README.md`
//! - [`manifest`] - a dependency range inside `idf_component.yml`
//!
//! [`cross_stack`] handles the joint attestation required when frameworks
//! that interact are used together.
//!
//! Evidence lookups never return errors. Anything that cannot be proven is a
//! failed [`EvidenceRecord`] whose details explain what was missing.

pub mod cross_stack;
pub mod manifest;
pub mod table;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::version::Version;

pub use cross_stack::{reconcile, CrossStackInput, STACK_EVIDENCE_ENV};

/// Outcome of auditing one piece of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRecord {
    /// Whether the evidence affirms compatibility.
    pub ok: bool,
    /// One-line human-readable summary.
    pub summary: String,
    /// Evidence trail, kept regardless of outcome.
    pub details: Vec<String>,
}

impl EvidenceRecord {
    pub fn pass(summary: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            ok: true,
            summary: summary.into(),
            details,
        }
    }

    pub fn fail(summary: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            ok: false,
            summary: summary.into(),
            details,
        }
    }
}

/// A located framework checkout and its revision description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub path: PathBuf,
    /// Output of `git describe --tags --always --dirty`.
    pub revision: String,
}

impl Checkout {
    pub fn new(path: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            revision: revision.into(),
        }
    }
}

/// The kind of evidence a framework ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    /// Support matrix embedded in a text document.
    Table,
    /// Toolchain dependency range in a component manifest.
    Manifest,
}

impl EvidenceSource {
    /// Query this evidence source for `checkout` against `toolchain`.
    pub fn evaluate(&self, checkout: &Checkout, toolchain: &Version) -> EvidenceRecord {
        match self {
            Self::Table => table::check(checkout, toolchain),
            Self::Manifest => manifest::check(checkout, toolchain),
        }
    }
}

/// Read a text file, replacing undecodable bytes instead of failing.
///
/// Returns `None` when the file does not exist or cannot be read.
pub(crate) fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn record_constructors() {
        let ok = EvidenceRecord::pass("fine", vec!["a".into()]);
        assert!(ok.ok);
        assert_eq!(ok.details, vec!["a"]);

        let bad = EvidenceRecord::fail("broken", Vec::new());
        assert!(!bad.ok);
        assert_eq!(bad.summary, "broken");
    }

    #[test]
    fn read_lossy_tolerates_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, b"ok \xff\xfe tail").unwrap();

        let text = read_lossy(&path).unwrap();
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" tail"));
    }

    #[test]
    fn read_lossy_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(read_lossy(&temp.path().join("absent")).is_none());
    }

    #[test]
    fn record_serializes_to_json() {
        let record = EvidenceRecord::fail("nope", vec!["why".into()]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["details"][0], "why");
    }
}
