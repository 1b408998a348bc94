//! espcompat - ESP-IDF plugin framework compatibility auditor.
//!
//! Decides, from local evidence only, whether the installed ESP-IDF release
//! is supported by the plugin frameworks a firmware project uses (ESP-ADF,
//! ESP-SR), and whether those frameworks have been pinned together. Missing
//! or ambiguous evidence is always a failure.
//!
//! # Modules
//!
//! - [`audit`] - Audit state machine and evidence report
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Environment-driven configuration
//! - [`detection`] - Which frameworks a project uses
//! - [`error`] - Error types and result aliases
//! - [`evidence`] - Support matrix, manifest and cross-stack evidence
//! - [`framework`] - Known plugin frameworks
//! - [`shell`] - Toolchain and source-control collaborators
//! - [`ui`] - Terminal echo of the report
//! - [`version`] - Versions and constraint expressions
//!
//! # Example
//!
//! ```
//! use espcompat::version::{evaluate, parse_version};
//!
//! let idf = parse_version("ESP-IDF v5.3.1").unwrap();
//! assert!(evaluate(&idf, ">=5.0,<5.6"));
//! assert!(!evaluate(&idf, ">=5.0,^5.3"));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod evidence;
pub mod framework;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{CompatError, Result};
