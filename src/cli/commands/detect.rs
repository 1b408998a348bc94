//! Detect command implementation.
//!
//! `espcompat detect` prints the frameworks the project uses, one per line.

use std::io::Write;

use crate::cli::args::DetectArgs;
use crate::config::AuditConfig;
use crate::detection::detect_usage;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The detect command implementation.
pub struct DetectCommand {
    config: AuditConfig,
    args: DetectArgs,
}

impl DetectCommand {
    pub fn new(config: AuditConfig, args: DetectArgs) -> Self {
        Self { config, args }
    }
}

impl Command for DetectCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let override_list = self
            .args
            .plugins
            .as_deref()
            .or(self.config.required_plugins.as_deref());
        let used = detect_usage(&self.config.project_dir, override_list);

        if used.is_empty() {
            writeln!(out, "none")?;
        }
        for id in &used {
            writeln!(out, "{id}")?;
        }
        Ok(CommandResult::success())
    }
}
