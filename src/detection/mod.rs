//! Framework usage detection.
//!
//! Which frameworks a project depends on is decided either explicitly, by a
//! comma-separated override list, or heuristically by a [`UsageDetector`].
//! The override always wins: when present, no scanning happens at all.

pub mod scan;

use std::collections::BTreeSet;
use std::path::Path;

pub use scan::{ContentScanner, MAX_SCAN_FILE_SIZE};

/// Environment variable holding the explicit usage override.
pub const REQUIRED_PLUGINS_ENV: &str = "ESP_REQUIRED_PLUGINS";

/// Strategy for discovering framework usage in a project tree.
pub trait UsageDetector {
    /// Identities of the frameworks used under `project_root`.
    fn detect(&self, project_root: &Path) -> BTreeSet<String>;
}

/// Parse an override list into trimmed, lowercase identities.
///
/// Returns `None` when the override is blank, meaning "not set".
pub fn parse_override(list: &str) -> Option<BTreeSet<String>> {
    if list.trim().is_empty() {
        return None;
    }
    Some(
        list.split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect(),
    )
}

/// Detect framework usage with the default content scanner.
pub fn detect_usage(project_root: &Path, override_list: Option<&str>) -> BTreeSet<String> {
    detect_usage_with(project_root, override_list, &ContentScanner::new())
}

/// Detect framework usage with a custom detector.
pub fn detect_usage_with(
    project_root: &Path,
    override_list: Option<&str>,
    detector: &dyn UsageDetector,
) -> BTreeSet<String> {
    if let Some(explicit) = override_list.and_then(parse_override) {
        tracing::debug!("Using explicit framework list: {:?}", explicit);
        return explicit;
    }
    detector.detect(project_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingDetector {
        calls: Cell<usize>,
    }

    impl UsageDetector for CountingDetector {
        fn detect(&self, _project_root: &Path) -> BTreeSet<String> {
            self.calls.set(self.calls.get() + 1);
            BTreeSet::from(["esp-sr".to_string()])
        }
    }

    #[test]
    fn override_is_normalized() {
        let set = parse_override(" ESP-ADF , esp-sr,,").unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["esp-adf".to_string(), "esp-sr".to_string()]
        );
    }

    #[test]
    fn blank_override_means_unset() {
        assert!(parse_override("").is_none());
        assert!(parse_override("   ").is_none());
    }

    #[test]
    fn override_skips_heuristics() {
        let detector = CountingDetector {
            calls: Cell::new(0),
        };
        let set = detect_usage_with(Path::new("."), Some("esp-adf"), &detector);
        assert_eq!(detector.calls.get(), 0);
        assert!(set.contains("esp-adf"));
        assert!(!set.contains("esp-sr"));
    }

    #[test]
    fn separators_only_override_yields_empty_set() {
        let detector = CountingDetector {
            calls: Cell::new(0),
        };
        let set = detect_usage_with(Path::new("."), Some(" , "), &detector);
        assert!(set.is_empty());
        assert_eq!(detector.calls.get(), 0);
    }

    #[test]
    fn missing_override_uses_detector() {
        let detector = CountingDetector {
            calls: Cell::new(0),
        };
        let set = detect_usage_with(Path::new("."), None, &detector);
        assert_eq!(detector.calls.get(), 1);
        assert!(set.contains("esp-sr"));
    }
}
