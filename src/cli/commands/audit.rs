//! Audit command implementation.
//!
//! `espcompat audit` runs the full compatibility audit, writes the evidence
//! report and maps the verdict to the process exit code:
//! 0 pass, 1 toolchain precondition failed, 2 one or more checks failed.
//! A report that cannot be written aborts with
//! [`EXIT_REPORT_WRITE`](crate::error::EXIT_REPORT_WRITE).

use std::io::Write;

use crate::audit::Auditor;
use crate::cli::args::AuditArgs;
use crate::config::AuditConfig;
use crate::detection::ContentScanner;
use crate::error::{CompatError, Result};
use crate::shell::{Host, SystemHost};
use crate::ui::ReportPrinter;

use super::dispatcher::{Command, CommandResult};

/// The audit command implementation.
pub struct AuditCommand {
    config: AuditConfig,
    args: AuditArgs,
    printer: ReportPrinter,
    quiet: bool,
}

impl AuditCommand {
    pub fn new(config: AuditConfig, args: AuditArgs, printer: ReportPrinter, quiet: bool) -> Self {
        Self {
            config,
            args,
            printer,
            quiet,
        }
    }

    /// Configuration with this command's flags applied.
    pub fn effective_config(&self) -> AuditConfig {
        let mut config = self.config.clone();
        if let Some(build_dir) = &self.args.build_dir {
            config = config.with_build_dir(build_dir.clone());
        }
        if let Some(idf_py) = &self.args.idf_py {
            config = config.with_idf_py(idf_py.clone());
        }
        if let Some(plugins) = &self.args.plugins {
            config = config.with_required_plugins(plugins.clone());
        }
        config
    }

    /// Run the audit against an explicit host.
    pub fn execute_with(&self, host: &dyn Host, out: &mut dyn Write) -> Result<CommandResult> {
        let config = self.effective_config();
        let detector = ContentScanner::new();
        let outcome = Auditor::new(&config, host, &detector).run()?;

        if self.args.json {
            serde_json::to_writer_pretty(&mut *out, &outcome)
                .map_err(|e| CompatError::Other(e.into()))?;
            writeln!(out)?;
        } else if !self.quiet {
            self.printer.print(out, &outcome.report)?;
        }

        let code = outcome.verdict.exit_code();
        if outcome.verdict.is_pass() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(code))
        }
    }
}

impl Command for AuditCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let host = SystemHost::new(self.effective_config().idf_py);
        self.execute_with(&host, out)
    }
}
