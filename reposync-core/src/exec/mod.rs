//! Command execution for reposync
//!
//! Commands are built as typed argument vectors and grouped into
//! [`Invocation`]s. An [`Executor`] runs invocations either one at a time
//! ([`Executor::run_now`]) or as a queued [`CommandBatch`]
//! ([`Executor::execute`]).

mod batch;
mod system;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

pub use batch::CommandBatch;
pub use system::SystemExecutor;

/// Outcome of running an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the last command of the invocation exited successfully
    pub success: bool,
    /// Captured stdout and stderr of every command, in order
    pub output: String,
}

impl ExecutionResult {
    /// A successful result with the given output
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// A failed result with the given output
    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    /// Short human readable description, used in error messages
    pub fn summary(&self) -> String {
        let output = self.output.trim();
        match (self.success, output.is_empty()) {
            (true, true) => "command succeeded".to_string(),
            (true, false) => format!("command succeeded: {}", output),
            (false, true) => "command failed with no output".to_string(),
            (false, false) => format!("command failed: {}", output),
        }
    }
}

/// A single program with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Create a command line for the given program
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program to run
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments passed to the program
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Commands that run back to back, optionally inside a working directory
///
/// Every command runs even if an earlier one fails. The invocation succeeds
/// when its last command succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    workdir: Option<PathBuf>,
    commands: Vec<CommandLine>,
}

impl Invocation {
    /// An empty invocation in the current directory
    pub fn new() -> Self {
        Self::default()
    }

    /// An invocation of a single command
    pub fn single(command: CommandLine) -> Self {
        Self {
            workdir: None,
            commands: vec![command],
        }
    }

    /// An empty invocation scoped to `dir`
    pub fn scoped(dir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(dir.into()),
            commands: Vec::new(),
        }
    }

    /// Scope this invocation to `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Append a command
    pub fn push(&mut self, command: CommandLine) {
        self.commands.push(command);
    }

    /// Append a command, builder style
    pub fn then(mut self, command: CommandLine) -> Self {
        self.push(command);
        self
    }

    /// Working directory, if scoped
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn commands(&self) -> &[CommandLine] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.workdir {
            write!(f, "cd {}", dir.display())?;
            if !self.commands.is_empty() {
                write!(f, "; ")?;
            }
        }
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

/// Runs invocations against the operating system (or a fake in tests)
pub trait Executor {
    /// Run one invocation to completion
    ///
    /// A non-zero exit is reported through [`ExecutionResult::success`];
    /// `Err` is reserved for commands that could not be started at all.
    fn run(&self, invocation: &Invocation) -> Result<ExecutionResult>;

    /// Run every invocation queued in `batch`, in order
    ///
    /// Returns the result of the last invocation and leaves the batch empty.
    /// An empty batch yields a successful, empty result.
    fn execute(&self, batch: &mut CommandBatch) -> Result<ExecutionResult> {
        let mut last = ExecutionResult::success("");
        for invocation in batch.take() {
            last = self.run(&invocation)?;
        }
        Ok(last)
    }

    /// Run a single invocation outside of any batch and return its output
    fn run_now(&self, invocation: &Invocation) -> Result<String> {
        Ok(self.run(invocation)?.output)
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn run(&self, invocation: &Invocation) -> Result<ExecutionResult> {
        (**self).run(invocation)
    }
}
