//! Executor backed by real processes

use std::process::{Command, Stdio};

use super::{ExecutionResult, Executor, Invocation};
use crate::Result;

/// Runs invocations with [`std::process::Command`]
///
/// Each command in an invocation is spawned on its own with the
/// invocation's working directory. Nothing goes through a shell, so paths
/// and branch names are passed as single arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SystemExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::success("");

        for command_line in invocation.commands() {
            let mut cmd = Command::new(command_line.program());
            cmd.args(command_line.arguments())
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());

            if let Some(dir) = invocation.workdir() {
                cmd.current_dir(dir);
            }

            tracing::debug!(command = %command_line, workdir = ?invocation.workdir(), "Running command");

            let output = cmd.output()?;
            result.output.push_str(&String::from_utf8_lossy(&output.stdout));
            result.output.push_str(&String::from_utf8_lossy(&output.stderr));
            result.success = output.status.success();

            if !result.success {
                tracing::debug!(command = %command_line, status = ?output.status.code(), "Command failed");
            }
        }

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::exec::CommandLine;

    #[test]
    fn test_runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::scoped(dir.path()).then(CommandLine::new("pwd"));
        let result = SystemExecutor::new().run(&inv).unwrap();
        assert!(result.success);
        let reported = std::path::PathBuf::from(result.output.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_status_is_last_command() {
        let inv = Invocation::new()
            .then(CommandLine::new("false"))
            .then(CommandLine::new("true"));
        assert!(SystemExecutor::new().run(&inv).unwrap().success);

        let inv = Invocation::new()
            .then(CommandLine::new("true"))
            .then(CommandLine::new("false"));
        assert!(!SystemExecutor::new().run(&inv).unwrap().success);
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let inv = Invocation::single(CommandLine::new("reposync-definitely-not-installed"));
        let err = SystemExecutor::new().run(&inv).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
