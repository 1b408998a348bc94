//! Audit configuration.
//!
//! Every input is optional and comes from the environment:
//!
//! | Variable                    | Meaning                                  |
//! |-----------------------------|------------------------------------------|
//! | `PROJECT_DIR`               | project root (default: current dir)      |
//! | `BUILD_DIR`                 | report directory (default: `<project>/build`) |
//! | `IDF_PY`                    | toolchain front-end (default: `idf.py`)  |
//! | `ESP_REQUIRED_PLUGINS`      | explicit framework list                  |
//! | `ESP_ADF_DIR`, `ADF_PATH`   | ESP-ADF checkout                         |
//! | `ESP_SR_DIR`, `ESP_SR_PATH` | ESP-SR checkout                          |
//! | `ESP_STACK_COMPAT_EVIDENCE` | cross-stack attestation                  |
//!
//! Command-line flags are layered on top with the `with_*` methods.

pub mod checkout;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::detection::REQUIRED_PLUGINS_ENV;
use crate::error::Result;
use crate::evidence::STACK_EVIDENCE_ENV;
use crate::framework::Framework;
use crate::shell::DEFAULT_IDF_PY;

pub use checkout::{expand_home, resolve_checkout};

/// File name of the persisted evidence report.
pub const REPORT_FILE: &str = "plugin-compatibility-evidence.txt";

/// Resolved inputs for one audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Absolute project root.
    pub project_dir: PathBuf,
    /// Report directory; `<project>/build` when unset.
    pub build_dir: Option<PathBuf>,
    /// Toolchain front-end executable.
    pub idf_py: String,
    /// Raw explicit framework list.
    pub required_plugins: Option<String>,
    /// Checkout override values per framework, in lookup order.
    pub checkout_overrides: BTreeMap<Framework, Vec<String>>,
    /// Home directory for `~` expansion and default checkouts.
    pub home: Option<PathBuf>,
    /// Cross-stack attestation.
    pub stack_evidence: Option<String>,
}

impl AuditConfig {
    /// Configuration with defaults for `project_dir` and nothing overridden.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            build_dir: None,
            idf_py: DEFAULT_IDF_PY.to_string(),
            required_plugins: None,
            checkout_overrides: BTreeMap::new(),
            home: None,
            stack_evidence: None,
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_env_with(
            |key| std::env::var(key),
            &cwd,
            dirs::home_dir(),
        ))
    }

    /// Load with a custom env var lookup (for testing).
    pub fn from_env_with<F>(env_fn: F, cwd: &Path, home: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let project = env_fn("PROJECT_DIR").unwrap_or_else(|_| ".".to_string());
        let mut config = Self::new(absolutize(cwd, Path::new(&project)));

        config.build_dir = env_fn("BUILD_DIR").ok().map(PathBuf::from);
        if let Ok(idf_py) = env_fn("IDF_PY") {
            config.idf_py = idf_py;
        }
        config.required_plugins = env_fn(REQUIRED_PLUGINS_ENV).ok();
        config.stack_evidence = env_fn(STACK_EVIDENCE_ENV).ok();
        config.home = home;

        for fw in Framework::ALL {
            let values = fw
                .checkout_env_vars()
                .iter()
                .map(|var| env_fn(var).unwrap_or_default())
                .collect();
            config.checkout_overrides.insert(fw, values);
        }

        config
    }

    /// Override the project root, resolved against `cwd`.
    pub fn with_project_dir(mut self, cwd: &Path, project: &Path) -> Self {
        self.project_dir = absolutize(cwd, project);
        self
    }

    pub fn with_build_dir(mut self, build_dir: PathBuf) -> Self {
        self.build_dir = Some(build_dir);
        self
    }

    pub fn with_idf_py(mut self, idf_py: impl Into<String>) -> Self {
        self.idf_py = idf_py.into();
        self
    }

    pub fn with_required_plugins(mut self, list: impl Into<String>) -> Self {
        self.required_plugins = Some(list.into());
        self
    }

    pub fn with_checkout(mut self, fw: Framework, path: impl Into<String>) -> Self {
        self.checkout_overrides.insert(fw, vec![path.into()]);
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_stack_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.stack_evidence = Some(evidence.into());
        self
    }

    /// Directory the report is written to.
    pub fn build_dir(&self) -> PathBuf {
        self.build_dir
            .clone()
            .unwrap_or_else(|| self.project_dir.join("build"))
    }

    /// Full path of the persisted report.
    pub fn report_path(&self) -> PathBuf {
        self.build_dir().join(REPORT_FILE)
    }

    /// Ordered checkout candidates for `fw`: overrides, then `~/esp/<id>`.
    pub fn checkout_candidates(&self, fw: Framework) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self
            .checkout_overrides
            .get(&fw)
            .into_iter()
            .flatten()
            .filter(|v| !v.is_empty())
            .map(|v| expand_home(v, self.home.as_deref()))
            .collect();
        if let Some(home) = &self.home {
            candidates.push(home.join(fw.default_checkout()));
        }
        candidates
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = cwd.join(path);
    std::fs::canonicalize(&joined).unwrap_or(joined)
}
