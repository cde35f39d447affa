//! Branch enumeration for local working copies

use std::path::Path;

use super::command::{GitCli, GitCommand};
use crate::exec::{Executor, Invocation};
use crate::Result;

/// Run `git branch` inside `destination` and return its raw output
pub fn list_branches<E: Executor>(executor: &E, git: &GitCli, destination: &Path) -> Result<String> {
    let invocation = Invocation::scoped(destination).then(git.command(&GitCommand::Branch));
    executor.run_now(&invocation)
}

/// Call `callback` with every non-blank line of `git branch` output
///
/// Lines are passed through unsanitized. An error from the callback stops
/// the enumeration and is returned.
pub fn for_each_branch<E, F>(executor: &E, git: &GitCli, destination: &Path, mut callback: F) -> Result<()>
where
    E: Executor,
    F: FnMut(&str) -> Result<()>,
{
    tracing::info!(destination = %destination.display(), "Listing branches");
    let output = list_branches(executor, git, destination)?;
    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        callback(line)?;
    }
    Ok(())
}

/// Strip the current-branch marker and surrounding whitespace
pub fn sanitize(branch_line: &str) -> String {
    branch_line.replace('*', "").trim().to_string()
}
