//! Line-oriented evidence report.
//!
//! The report is a flat text document other tooling scrapes, so its shape is
//! fixed: `key=value` metadata lines, outcome lines prefixed `[OK] ` or
//! `[FAIL] `, and diagnostic lines indented by two spaces directly above the
//! outcome they belong to.

use std::fs;
use std::path::Path;

use crate::error::{CompatError, Result};
use crate::evidence::EvidenceRecord;

pub const OK_PREFIX: &str = "[OK] ";
pub const FAIL_PREFIX: &str = "[FAIL] ";
pub const DETAIL_INDENT: &str = "  ";

/// Append-only report under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportBuilder {
    lines: Vec<String>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key=value` metadata line.
    pub fn meta(&mut self, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.lines.push(format!("{key}={value}"));
        self
    }

    /// Append an outcome line.
    pub fn outcome(&mut self, ok: bool, summary: &str) -> &mut Self {
        let prefix = if ok { OK_PREFIX } else { FAIL_PREFIX };
        self.lines.push(format!("{prefix}{summary}"));
        self
    }

    /// Append a free-form line verbatim.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    /// Append a record: its details, then its outcome line.
    pub fn record(&mut self, record: &EvidenceRecord) -> &mut Self {
        for detail in &record.details {
            self.lines.push(format!("{DETAIL_INDENT}{detail}"));
        }
        self.outcome(record.ok, &record.summary)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The document text: lines joined by newlines, with a trailing newline.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the rendered report, creating parent directories.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let write_err = |source| CompatError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.render()).map_err(write_err)?;
        tracing::debug!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn record_puts_details_above_outcome() {
        let mut report = ReportBuilder::new();
        report.meta("used-plugins", "esp-sr");
        report.record(&EvidenceRecord::fail(
            "range not found",
            vec!["ESP-SR git describe: v1.9.0".into()],
        ));
        assert_eq!(
            report.lines(),
            &[
                "used-plugins=esp-sr",
                "  ESP-SR git describe: v1.9.0",
                "[FAIL] range not found",
            ]
        );
    }

    #[test]
    fn render_has_trailing_newline() {
        let mut report = ReportBuilder::new();
        report.outcome(true, "fine").meta("result", "PASS");
        assert_eq!(report.render(), "[OK] fine\nresult=PASS\n");
    }

    #[test]
    fn persist_creates_build_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build/nested/report.txt");
        let mut report = ReportBuilder::new();
        report.line("project_dir=/p");
        report.persist(&path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "project_dir=/p\n");
    }

    #[test]
    fn persist_reports_unwritable_target() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("build");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = ReportBuilder::new()
            .persist(&blocker.join("report.txt"))
            .unwrap_err();
        assert!(matches!(err, CompatError::ReportWrite { .. }));
    }
}
