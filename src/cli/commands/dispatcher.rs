//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::PathBuf;

use crate::cli::args::{AuditArgs, Cli, Commands};
use crate::config::AuditConfig;
use crate::error::Result;
use crate::ui::ReportPrinter;

use super::audit::AuditCommand;
use super::detect::DetectCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing user-facing output to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    cwd: PathBuf,
    base: AuditConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher resolving paths against `cwd`, starting from `base`.
    pub fn new(cwd: PathBuf, base: AuditConfig) -> Self {
        Self { cwd, base }
    }

    fn config_for(&self, cli: &Cli) -> AuditConfig {
        match &cli.project {
            Some(project) => self.base.clone().with_project_dir(&self.cwd, project),
            None => self.base.clone(),
        }
    }

    /// Dispatch and execute a command. No subcommand means `audit`.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let config = self.config_for(cli);
        let printer = ReportPrinter::new(cli.no_color);

        match &cli.command {
            Some(Commands::Audit(args)) => {
                AuditCommand::new(config, args.clone(), printer, cli.quiet).execute(out)
            }
            Some(Commands::Detect(args)) => {
                DetectCommand::new(config, args.clone()).execute(out)
            }
            None => {
                AuditCommand::new(config, AuditArgs::default(), printer, cli.quiet).execute(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn result_constructors() {
        assert_eq!(
            CommandResult::success(),
            CommandResult {
                success: true,
                exit_code: 0
            }
        );
        let failed = CommandResult::failure(2);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 2);
    }

    #[test]
    fn project_flag_overrides_base_config() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().canonicalize().unwrap();
        std::fs::create_dir(cwd.join("fw")).unwrap();

        let dispatcher = CommandDispatcher::new(cwd.clone(), AuditConfig::new(&cwd));
        let cli = Cli::parse_from(["espcompat", "--project", "fw", "detect"]);
        assert_eq!(dispatcher.config_for(&cli).project_dir, cwd.join("fw"));
    }

    #[test]
    fn detect_dispatches_with_explicit_plugins() {
        let temp = TempDir::new().unwrap();
        let dispatcher =
            CommandDispatcher::new(temp.path().to_path_buf(), AuditConfig::new(temp.path()));
        let cli = Cli::parse_from(["espcompat", "detect", "--plugins", "esp-sr"]);

        let mut out = Vec::new();
        let result = dispatcher.dispatch(&cli, &mut out).unwrap();
        assert!(result.success);
        assert_eq!(String::from_utf8(out).unwrap(), "esp-sr\n");
    }
}
