//! Typed git commands

use std::path::{Path, PathBuf};

use crate::config::SyncConfig;
use crate::exec::{CommandLine, Invocation};

/// A git subcommand with its structured arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// `git <action> <source> <destination>`
    Clone {
        action: String,
        source: String,
        destination: PathBuf,
    },
    /// `git clean -f`
    Clean,
    /// `git reset --hard HEAD`
    ResetHard,
    /// `git checkout <branch>`
    Checkout { branch: String },
    /// `git pull`
    Pull,
    /// `git branch`
    Branch,
}

/// Renders [`GitCommand`]s for a particular git executable
#[derive(Debug, Clone)]
pub struct GitCli {
    git_path: String,
    baseline_branch: String,
}

impl GitCli {
    pub fn new(git_path: impl Into<String>, baseline_branch: impl Into<String>) -> Self {
        Self {
            git_path: git_path.into(),
            baseline_branch: baseline_branch.into(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.git_path, &config.baseline_branch)
    }

    /// Build the command line for `command`
    pub fn command(&self, command: &GitCommand) -> CommandLine {
        let git = CommandLine::new(&self.git_path);
        match command {
            GitCommand::Clone {
                action,
                source,
                destination,
            } => git
                .args(action.split_whitespace())
                .arg(source)
                .arg(destination),
            GitCommand::Clean => git.args(["clean", "-f"]),
            GitCommand::ResetHard => git.args(["reset", "--hard", "HEAD"]),
            GitCommand::Checkout { branch } => git.arg("checkout").arg(branch),
            GitCommand::Pull => git.arg("pull"),
            GitCommand::Branch => git.arg("branch"),
        }
    }

    pub fn checkout(&self, branch: &str) -> CommandLine {
        self.command(&GitCommand::Checkout {
            branch: branch.to_string(),
        })
    }

    /// Discard untracked files, hard-reset to HEAD, return to the baseline branch
    pub fn reset_sequence(&self) -> Vec<CommandLine> {
        vec![
            self.command(&GitCommand::Clean),
            self.command(&GitCommand::ResetHard),
            self.checkout(&self.baseline_branch),
        ]
    }

    /// The reset sequence as a one-shot invocation inside `dir`
    pub fn reset_invocation(&self, dir: &Path) -> Invocation {
        self.reset_sequence()
            .into_iter()
            .fold(Invocation::scoped(dir), Invocation::then)
    }
}
