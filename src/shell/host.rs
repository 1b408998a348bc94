//! Toolchain and revision queries.

use std::path::Path;

use super::command::run_captured;
use crate::error::{CompatError, Result};

/// Conventional name of the ESP-IDF front-end.
pub const DEFAULT_IDF_PY: &str = "idf.py";

/// The external facts an audit depends on.
///
/// Implemented by [`SystemHost`] for real runs and by fakes in tests.
pub trait Host {
    /// Raw output of the toolchain's version command.
    fn toolchain_version(&self) -> Result<String>;

    /// Revision description of the checkout at `path`.
    fn describe_revision(&self, path: &Path) -> Result<String>;
}

/// Runs `idf.py --version` and `git describe` on the local machine.
#[derive(Debug, Clone)]
pub struct SystemHost {
    idf_py: String,
}

impl SystemHost {
    pub fn new(idf_py: impl Into<String>) -> Self {
        Self {
            idf_py: idf_py.into(),
        }
    }

    pub fn idf_py(&self) -> &str {
        &self.idf_py
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new(DEFAULT_IDF_PY)
    }
}

impl Host for SystemHost {
    fn toolchain_version(&self) -> Result<String> {
        let failed = |output: String| CompatError::ToolchainQuery {
            command: self.idf_py.clone(),
            output,
        };

        let out =
            run_captured(&self.idf_py, &["--version"], None).map_err(|e| failed(e.to_string()))?;
        if !out.success() {
            return Err(failed(out.output));
        }
        Ok(out.output)
    }

    fn describe_revision(&self, path: &Path) -> Result<String> {
        let failed = |output: String| CompatError::RevisionDescribe {
            path: path.to_path_buf(),
            output,
        };

        let out = run_captured(
            "git",
            &["describe", "--tags", "--always", "--dirty"],
            Some(path),
        )
        .map_err(|e| failed(e.to_string()))?;
        if !out.success() {
            return Err(failed(out.output));
        }
        Ok(out.output)
    }
}
