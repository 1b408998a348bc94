//! Captured command execution.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::error::Result;

/// Result of running a command to completion.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Stdout followed by stderr, trimmed.
    pub output: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `program` with `args`, blocking until it exits.
///
/// Spawn failures (e.g. program not on PATH) are returned as errors; a
/// non-zero exit is a successful call with a failing [`CommandOutput`].
pub fn run_captured(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    tracing::debug!("Running {} {}", program, args.join(" "));
    let output = cmd.output()?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&stderr);
    }

    tracing::debug!(
        "{} exited with {:?} after {:?}",
        program,
        output.status.code(),
        start.elapsed()
    );
    Ok(CommandOutput {
        exit_code: output.status.code(),
        output: combined.trim().to_string(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CompatError;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout() {
        let out = run_captured("sh", &["-c", "echo hello"], None).unwrap();
        assert!(out.success());
        assert_eq!(out.output, "hello");
    }

    #[test]
    fn merges_stderr_after_stdout() {
        let out = run_captured("sh", &["-c", "echo out; echo err >&2"], None).unwrap();
        assert_eq!(out.output, "out\nerr");
    }

    #[test]
    fn reports_nonzero_exit() {
        let out = run_captured("sh", &["-c", "echo nope; exit 3"], None).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(3));
    }

    #[test]
    fn runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker"), "").unwrap();
        let out = run_captured("sh", &["-c", "ls"], Some(temp.path())).unwrap();
        assert!(out.output.contains("marker"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = run_captured("this-command-does-not-exist-12345", &[], None).unwrap_err();
        assert!(matches!(err, CompatError::Io(_)));
    }
}
