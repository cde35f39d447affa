//! Fakes shared by unit tests

use std::cell::RefCell;
use std::path::PathBuf;

use crate::exec::{ExecutionResult, Executor, Invocation};
use crate::Result;

/// Executor that records every invocation and answers from a script
///
/// Responses are matched by substring against the invocation's display
/// form (`cd <dir>; git ...`); the first matching rule wins and unmatched
/// invocations succeed with no output.
#[derive(Default)]
pub struct RecordingExecutor {
    rules: Vec<(String, ExecutionResult)>,
    calls: RefCell<Vec<String>>,
    create_on_clone: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: &str, result: ExecutionResult) -> Self {
        self.rules.push((pattern.to_string(), result));
        self
    }

    /// Create the clone destination directory when a clone runs
    pub fn creating_clones(mut self) -> Self {
        self.create_on_clone = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ExecutionResult> {
        let rendered = invocation.to_string();
        self.calls.borrow_mut().push(rendered.clone());

        if self.create_on_clone {
            for command in invocation.commands() {
                let args = command.arguments();
                if args.first().is_some_and(|a| a == "clone") {
                    if let Some(dest) = args.last() {
                        std::fs::create_dir_all(PathBuf::from(dest))?;
                    }
                }
            }
        }

        Ok(self
            .rules
            .iter()
            .find(|(pattern, _)| rendered.contains(pattern.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| ExecutionResult::success("")))
    }
}
