//! Git operations for reposync
//!
//! Typed git commands, branch enumeration, remote address parsing and
//! read-only working copy inspection.

mod branch;
mod command;
mod remote;
mod repo;

pub use branch::{for_each_branch, list_branches, sanitize};
pub use command::{GitCli, GitCommand};
pub use remote::{extract_host, repository_name};
pub use repo::{WorkingCopy, WorkingCopyStatus};
