//! Sync command - clone or update a working copy and check out a branch

use std::path::PathBuf;

use clap::Args;
use reposync_core::{repository_name, SyncConfig, SyncRequest, Synchronizer, SystemExecutor};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Remote repository address (e.g. git@host:org/repo.git)
    #[arg(short, long)]
    pub source: String,

    /// Working copy path (defaults to <workspace_root>/<repository name>)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Branch to leave checked out
    #[arg(short, long, default_value = "master")]
    pub branch: String,

    /// Git verb used to create a missing working copy
    #[arg(long)]
    pub action: Option<String>,
}

impl SyncArgs {
    /// Resolve the request this invocation describes
    pub fn request(&self, config: &SyncConfig) -> anyhow::Result<SyncRequest> {
        let destination = match &self.dest {
            Some(dest) => dest.clone(),
            None => config.workspace_root()?.join(repository_name(&self.source)),
        };

        let action = self
            .action
            .clone()
            .unwrap_or_else(|| config.clone_action.clone());

        Ok(SyncRequest::new(destination, &self.source)
            .with_branch(&self.branch)
            .with_action(action))
    }

    /// Execute the sync command
    pub async fn execute(&self, verbose: bool, config: &SyncConfig) -> anyhow::Result<()> {
        let request = self.request(config)?;

        if verbose {
            tracing::info!(
                source = %request.source,
                destination = %request.destination.display(),
                branch = %request.branch,
                "Starting sync"
            );
        }

        let config = config.clone();
        let path = tokio::task::spawn_blocking(move || {
            Synchronizer::new(SystemExecutor::new(), &config).sync_and_checkout(&request)
        })
        .await??;

        println!("{}", path.display());
        Ok(())
    }
}
