//! reposync CLI - keep local git working copies in step with their remotes

mod commands;

use clap::{Parser, Subcommand};
use reposync_core::SyncConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{LifecycleOp, PathArgs, ProbeArgs, StatusArgs, SyncArgs};

/// reposync: clone, converge and check out git working copies
#[derive(Parser, Debug)]
#[command(name = "reposync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Never reset or remove working copies
    #[arg(long, global = true)]
    debug_mode: bool,

    /// Path to git executable (overrides config and env)
    #[arg(long, global = true, env = "REPOSYNC_GIT_PATH")]
    git_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Clone or update a working copy and check out a branch
    #[command(visible_alias = "s")]
    Sync(SyncArgs),

    /// Discard local changes and return to the baseline branch
    Reset(PathArgs),

    /// Delete a working copy
    Remove(PathArgs),

    /// Check that a remote's host is reachable
    Probe(ProbeArgs),

    /// Show the state of a working copy
    Status(StatusArgs),

    /// Show current configuration
    Config,
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(default_filter(cli.verbose))
        .init();

    // Load configuration with overrides
    let config = SyncConfig::load_with_overrides(cli.git_path.clone(), cli.debug_mode)?;

    if cli.verbose {
        tracing::info!(
            git_path = %config.git_path,
            debug_mode = config.debug_mode,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("reposync {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Sync(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Reset(args)) => {
            args.execute(LifecycleOp::Reset, &config).await?;
        }
        Some(Commands::Remove(args)) => {
            args.execute(LifecycleOp::Remove, &config).await?;
        }
        Some(Commands::Probe(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Status(args)) => {
            args.execute().await?;
        }
        Some(Commands::Config) => {
            println!("reposync Configuration");
            println!("======================");
            println!();
            println!("  git_path:        {}", config.git_path);
            println!("  ping_path:       {}", config.ping_path);
            println!("  probe_count:     {}", config.probe_count);
            println!("  baseline_branch: {}", config.baseline_branch);
            println!("  clone_action:    {}", config.clone_action);
            println!("  debug_mode:      {}", config.debug_mode);
            match config.workspace_root() {
                Ok(root) => println!("  workspace_root:  {}", root.display()),
                Err(e) => println!("  workspace_root:  ({})", e),
            }
            println!();
            if let Some(path) = SyncConfig::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("reposync - keep local git working copies in step with their remotes");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
