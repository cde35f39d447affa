//! Error types for reposync

use thiserror::Error;

use crate::exec::ExecutionResult;

/// Result type alias for reposync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reposync operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error, including failures to spawn a process or remove a directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A sync request is missing a destination or source
    #[error("Invalid sync request: {0}")]
    InvalidRequest(String),

    /// The remote host did not answer the reachability probe
    #[error("Cannot connect to git repository: {remote}")]
    Connectivity {
        /// Remote address that failed the probe
        remote: String,
    },

    /// The final checkout failed or left no working copy behind
    #[error("Sync failed: {}", .0.summary())]
    Sync(ExecutionResult),

    /// Working copy inspection error
    #[error("Git error: {0}")]
    Git(String),
}

impl From<git2::Error> for Error {
    fn from(e: git2::Error) -> Self {
        Error::Git(e.message().to_string())
    }
}
