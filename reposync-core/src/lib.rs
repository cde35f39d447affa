//! reposync core - keeps local git working copies in step with their remotes
//!
//! The [`Synchronizer`] clones or updates a working copy, converges every
//! branch and checks out the requested one. [`Lifecycle`] resets or removes
//! working copies afterwards. All git work goes through an [`Executor`],
//! which runs typed commands without a shell.

pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod lifecycle;
pub mod probe;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use exec::{CommandBatch, CommandLine, ExecutionResult, Executor, Invocation, SystemExecutor};
pub use git::{extract_host, repository_name, GitCli, GitCommand, WorkingCopy, WorkingCopyStatus};
pub use lifecycle::Lifecycle;
pub use probe::Prober;
pub use sync::{SyncRequest, Synchronizer};
