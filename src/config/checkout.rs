//! Framework checkout resolution.

use std::path::{Path, PathBuf};

/// Expand a leading `~` against `home`. Other paths are returned as-is.
pub fn expand_home(value: &str, home: Option<&Path>) -> PathBuf {
    match (value.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(value),
    }
}

/// First candidate that is an existing directory.
pub fn resolve_checkout(candidates: &[PathBuf]) -> Option<PathBuf> {
    let found = candidates.iter().find(|c| c.is_dir()).cloned();
    tracing::debug!("Checkout candidates {:?} resolved to {:?}", candidates, found);
    found
}
