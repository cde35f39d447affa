//! Status command - show a working copy's branch, HEAD and cleanliness

use std::path::PathBuf;

use clap::Args;
use reposync_core::WorkingCopy;

/// Show the state of a working copy
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Working copy path
    pub path: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let status = WorkingCopy::inspect(&self.path)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        println!("Working copy: {}", status.path.display());
        println!(
            "  branch: {}",
            status.branch.as_deref().unwrap_or("(detached)")
        );
        println!("  head:   {}", status.head.as_deref().unwrap_or("(none)"));
        println!("  state:  {}", if status.dirty { "dirty" } else { "clean" });
        Ok(())
    }
}
