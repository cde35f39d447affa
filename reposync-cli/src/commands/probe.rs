//! Probe command - check that a remote's host answers ping

use clap::Args;
use reposync_core::{extract_host, Prober, SyncConfig, SystemExecutor};

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Remote repository address (e.g. git@host:org/repo.git)
    pub remote: String,
}

impl ProbeArgs {
    /// Execute the probe command
    pub async fn execute(&self, config: &SyncConfig) -> anyhow::Result<()> {
        let host = extract_host(&self.remote);
        if host.is_empty() {
            anyhow::bail!("No host found in remote address: {}", self.remote);
        }

        let remote = self.remote.clone();
        let config = config.clone();
        let connected = tokio::task::spawn_blocking(move || {
            Prober::new(SystemExecutor::new(), &config).is_connected(&remote)
        })
        .await?;

        println!("host: {}", host);
        println!("connected: {}", connected);

        if !connected {
            anyhow::bail!("Cannot connect to git repository: {}", self.remote);
        }
        Ok(())
    }
}
