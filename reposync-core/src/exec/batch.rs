//! Queued command batches

use std::path::PathBuf;

use super::{CommandLine, Invocation};

/// An owned buffer of invocations waiting to run
///
/// Commands are appended to an open group. [`CommandBatch::seal`] closes the
/// open group so that later commands start a fresh invocation. A batch is
/// built for one synchronization step and drained by
/// [`Executor::execute`](super::Executor::execute).
#[derive(Debug, Default)]
pub struct CommandBatch {
    sealed: Vec<Invocation>,
    open: Invocation,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command to the open group
    pub fn append(&mut self, command: CommandLine) {
        self.open.push(command);
    }

    /// Append several commands to the open group
    pub fn extend<I: IntoIterator<Item = CommandLine>>(&mut self, commands: I) {
        for command in commands {
            self.append(command);
        }
    }

    /// Run the open group inside `dir`
    pub fn scope(&mut self, dir: impl Into<PathBuf>) {
        let open = std::mem::take(&mut self.open);
        self.open = open.in_dir(dir);
    }

    /// Close the open group; subsequent commands start a new invocation
    ///
    /// Sealing an empty group is a no-op.
    pub fn seal(&mut self) {
        let open = std::mem::take(&mut self.open);
        if !open.is_empty() {
            self.sealed.push(open);
        }
    }

    /// Drain every queued invocation, including the open group
    pub fn take(&mut self) -> Vec<Invocation> {
        self.seal();
        std::mem::take(&mut self.sealed)
    }

    /// Discard everything queued
    pub fn reset(&mut self) {
        self.sealed.clear();
        self.open = Invocation::new();
    }

    /// Number of invocations queued, counting a non-empty open group
    pub fn len(&self) -> usize {
        self.sealed.len() + usize::from(!self.open.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
