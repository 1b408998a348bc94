//! CLI argument definitions.
//!
//! Every input can also be supplied through the environment variable named
//! in its help text, which is how build systems usually drive the audit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// espcompat - ESP-IDF plugin framework compatibility auditor.
#[derive(Debug, Parser)]
#[command(name = "espcompat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true, env = "PROJECT_DIR")]
    pub project: Option<PathBuf>,

    /// Do not echo the audit report to stdout (`detect` output is unaffected)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Audit plugin framework compatibility (default if no command specified)
    Audit(AuditArgs),

    /// Show which plugin frameworks the project uses
    Detect(DetectArgs),
}

/// Arguments for the `audit` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AuditArgs {
    /// Directory the evidence report is written to [default: <project>/build]
    #[arg(long, env = "BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// ESP-IDF front-end used to query the toolchain version
    #[arg(long, env = "IDF_PY")]
    pub idf_py: Option<String>,

    /// Frameworks to audit, skipping source detection (comma-separated)
    #[arg(long, env = "ESP_REQUIRED_PLUGINS")]
    pub plugins: Option<String>,

    /// Print a JSON summary instead of the report lines
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectArgs {
    /// Explicit framework list, reported as-is (comma-separated)
    #[arg(long, env = "ESP_REQUIRED_PLUGINS")]
    pub plugins: Option<String>,
}
