//! Reset and removal of synchronized working copies
//!
//! Both operations only act on paths that exist, and never when debug mode
//! is on. Skips are logged and reported as `Ok(false)`.

use std::path::Path;

use crate::config::SyncConfig;
use crate::exec::Executor;
use crate::git::GitCli;
use crate::Result;

/// Destructive operations on local working copies
#[derive(Debug)]
pub struct Lifecycle<E> {
    executor: E,
    git: GitCli,
    debug_mode: bool,
}

impl<E: Executor> Lifecycle<E> {
    pub fn new(executor: E, config: &SyncConfig) -> Self {
        Self {
            executor,
            git: GitCli::from_config(config),
            debug_mode: config.debug_mode,
        }
    }

    /// Delete the working copy at `path`
    ///
    /// Returns whether anything was removed. Deletion errors propagate.
    pub fn remove_local_copy(&self, path: &Path) -> Result<bool> {
        self.guarded(path, |path| {
            tracing::info!(path = %path.display(), "Removing local repository");
            std::fs::remove_dir_all(path)?;
            Ok(())
        })
    }

    /// Discard local changes in `path` and return it to the baseline branch
    ///
    /// A single reset invocation; branches are not fetched or pulled.
    pub fn reset_local_copy(&self, path: &Path) -> Result<bool> {
        self.guarded(path, |path| {
            tracing::info!(path = %path.display(), "Resetting local repository");
            let output = self.executor.run_now(&self.git.reset_invocation(path))?;
            tracing::debug!(output = %output.trim(), "Reset output");
            tracing::info!(path = %path.display(), "Local repository reset");
            Ok(())
        })
    }

    fn guarded<F>(&self, path: &Path, action: F) -> Result<bool>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        if path.exists() && !self.debug_mode {
            action(path)?;
            Ok(true)
        } else {
            tracing::info!(
                path = %path.display(),
                debug_mode = self.debug_mode,
                "No repository at path or debug mode is on, skipping"
            );
            Ok(false)
        }
    }
}
