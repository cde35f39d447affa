//! Reset and remove commands

use std::path::PathBuf;

use clap::Args;
use reposync_core::{Lifecycle, SyncConfig, SystemExecutor};

/// Arguments shared by the reset and remove commands
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Working copy path
    pub path: PathBuf,
}

/// Which lifecycle operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Reset,
    Remove,
}

impl PathArgs {
    /// Execute a lifecycle command
    pub async fn execute(&self, op: LifecycleOp, config: &SyncConfig) -> anyhow::Result<()> {
        let path = self.path.clone();
        let config = config.clone();

        let done = tokio::task::spawn_blocking(move || {
            let lifecycle = Lifecycle::new(SystemExecutor::new(), &config);
            match op {
                LifecycleOp::Reset => lifecycle.reset_local_copy(&path),
                LifecycleOp::Remove => lifecycle.remove_local_copy(&path),
            }
        })
        .await??;

        let verb = match op {
            LifecycleOp::Reset => "reset",
            LifecycleOp::Remove => "removed",
        };

        if done {
            println!("{}: {}", verb, self.path.display());
        } else {
            println!(
                "skipped: {} (missing or debug mode is on)",
                self.path.display()
            );
        }

        Ok(())
    }
}
