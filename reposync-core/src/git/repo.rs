//! Working copy inspection

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, StatusOptions};
use serde::Serialize;

use crate::{Error, Result};

/// Snapshot of a working copy's HEAD and cleanliness
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingCopyStatus {
    /// Repository root
    pub path: PathBuf,
    /// Checked-out branch, `None` when detached or unborn
    pub branch: Option<String>,
    /// Abbreviated HEAD commit id, `None` when unborn
    pub head: Option<String>,
    /// Whether tracked or untracked changes are present
    pub dirty: bool,
}

/// Read-only view of a local working copy
pub struct WorkingCopy {
    repo: Repository,
    root: PathBuf,
}

impl std::fmt::Debug for WorkingCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingCopy")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WorkingCopy {
    /// Open the working copy rooted at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::open(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                Error::Config(format!("Not a git repository: {}", path.display()))
            } else {
                Error::from(e)
            }
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| Error::Config("Bare repositories are not supported".to_string()))?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Open and inspect in one step
    pub fn inspect(path: impl AsRef<Path>) -> Result<WorkingCopyStatus> {
        Self::open(path)?.status()
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    fn head_id(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(head
                .target()
                .map(|oid| oid.to_string().chars().take(7).collect())),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);
        Ok(!self.repo.statuses(Some(&mut options))?.is_empty())
    }

    pub fn status(&self) -> Result<WorkingCopyStatus> {
        Ok(WorkingCopyStatus {
            path: self.root.clone(),
            branch: self.current_branch()?,
            head: self.head_id()?,
            dirty: self.is_dirty()?,
        })
    }
}
