//! Heuristic source scan.
//!
//! Walks the project tree and matches file contents against one pattern per
//! known framework. This is best effort: unreadable files are skipped and
//! never fail the scan.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use super::UsageDetector;
use crate::framework::Framework;

/// Files larger than this are not read.
pub const MAX_SCAN_FILE_SIZE: u64 = 512 * 1024;

/// Directory and file names pruned from the walk.
pub const EXCLUDED_NAMES: &[&str] = &[".git", "build", "managed_components"];

/// Extensions that are scanned, in addition to extensionless files.
pub const SCANNED_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "h", "hpp", "cmake", "yml", "yaml"];

/// Scans source and config files for framework API names.
pub struct ContentScanner {
    patterns: Vec<(Framework, Regex)>,
}

impl Default for ContentScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentScanner {
    /// Create a scanner for all known frameworks.
    pub fn new() -> Self {
        let patterns = Framework::ALL
            .iter()
            .map(|fw| {
                let re = Regex::new(fw.usage_pattern()).expect("usage pattern is valid");
                (*fw, re)
            })
            .collect();
        Self { patterns }
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_NAMES.contains(&name))
}

/// Whether a file's extension makes it a scan candidate.
pub fn is_scannable(path: &Path) -> bool {
    match path.extension() {
        None => true,
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            SCANNED_EXTENSIONS.contains(&ext.as_str())
        }
    }
}

impl UsageDetector for ContentScanner {
    fn detect(&self, project_root: &Path) -> BTreeSet<String> {
        let mut hits = BTreeSet::new();

        let files = WalkDir::new(project_root)
            .into_iter()
            .filter_entry(|e| !is_excluded(e))
            .filter_map(Result::ok)
            .filter(|e| {
                // symlinked files are scanned; symlinked directories are not walked
                e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file())
            });

        for entry in files {
            if hits.len() == self.patterns.len() {
                break;
            }

            let path = entry.path();
            if !is_scannable(path) {
                continue;
            }
            match std::fs::metadata(path) {
                Ok(meta) if meta.len() <= MAX_SCAN_FILE_SIZE => {}
                _ => continue,
            }
            let Ok(bytes) = std::fs::read(path) else {
                tracing::debug!("Skipping unreadable file {}", path.display());
                continue;
            };
            let text = String::from_utf8_lossy(&bytes);

            for (fw, re) in &self.patterns {
                if !hits.contains(fw.id()) && re.is_match(&text) {
                    tracing::debug!("{} usage found in {}", fw, path.display());
                    hits.insert(fw.id().to_string());
                }
            }
        }

        hits
    }
}
