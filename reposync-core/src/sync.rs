//! Working copy synchronization
//!
//! [`Synchronizer::sync_and_checkout`] brings a local working copy in line
//! with its remote:
//!
//! 1. The remote host must pass the connectivity probe.
//! 2. A missing destination is cloned.
//! 3. Every local branch is reset, checked out and pulled, one executed
//!    batch per branch.
//! 4. The requested branch is checked out.
//!
//! Every directory-scoped invocation starts with the reset sequence
//! (`clean -f`, `reset --hard HEAD`, `checkout <baseline>`), so local
//! changes are always discarded rather than merged.

use std::path::{Path, PathBuf};

use crate::config::SyncConfig;
use crate::exec::{CommandBatch, ExecutionResult, Executor};
use crate::git::{for_each_branch, sanitize, GitCli, GitCommand, WorkingCopy};
use crate::probe::Prober;
use crate::{Error, Result};

/// Branch checked out when a request names none
pub const DEFAULT_BRANCH: &str = "master";

/// Git verb used to create a missing working copy when a request names none
pub const DEFAULT_ACTION: &str = "clone";

/// What to synchronize and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Local working copy path
    pub destination: PathBuf,
    /// Remote repository address
    pub source: String,
    /// Git verb used to create a missing working copy
    pub action: String,
    /// Branch left checked out afterwards
    pub branch: String,
}

impl SyncRequest {
    /// Create a request with the default action and branch
    pub fn new(destination: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
            action: DEFAULT_ACTION.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Check that destination and source are present
    ///
    /// An empty branch or action falls back to the defaults.
    pub fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            return Err(Error::InvalidRequest("destination is empty".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(Error::InvalidRequest("source is empty".to_string()));
        }
        Ok(())
    }

    fn branch(&self) -> &str {
        if self.branch.trim().is_empty() {
            DEFAULT_BRANCH
        } else {
            &self.branch
        }
    }

    fn action(&self) -> &str {
        if self.action.trim().is_empty() {
            DEFAULT_ACTION
        } else {
            &self.action
        }
    }
}

/// Clones, converges and checks out working copies
#[derive(Debug)]
pub struct Synchronizer<E> {
    executor: E,
    git: GitCli,
    config: SyncConfig,
}

impl<E: Executor> Synchronizer<E> {
    pub fn new(executor: E, config: &SyncConfig) -> Self {
        Self {
            executor,
            git: GitCli::from_config(config),
            config: config.clone(),
        }
    }

    /// Synchronize `request.destination` with `request.source` and check out
    /// `request.branch`
    ///
    /// Returns the destination path. Fails with [`Error::Connectivity`]
    /// before touching the working copy when the remote host is unreachable, and
    /// with [`Error::Sync`] when the final checkout fails or the
    /// destination is missing afterwards.
    pub fn sync_and_checkout(&self, request: &SyncRequest) -> Result<PathBuf> {
        request.validate()?;

        let prober = Prober::new(&self.executor, &self.config);
        if !prober.is_connected(&request.source) {
            return Err(Error::Connectivity {
                remote: request.source.clone(),
            });
        }

        tracing::info!(
            source = %request.source,
            destination = %request.destination.display(),
            branch = request.branch(),
            "Synchronizing working copy"
        );

        let destination = request.destination.as_path();
        if !destination.exists() {
            let result = self.clone_repo(request)?;
            if !destination.exists() {
                return Err(Error::Sync(result));
            }
        }
        self.converge_branches(destination)?;

        let result = self.checkout(destination, request.branch())?;
        if !(result.success && destination.exists()) {
            return Err(Error::Sync(result));
        }

        if let Ok(status) = WorkingCopy::inspect(destination) {
            tracing::info!(
                branch = ?status.branch,
                head = ?status.head,
                "Code checked out"
            );
        }

        Ok(request.destination.clone())
    }

    fn clone_repo(&self, request: &SyncRequest) -> Result<ExecutionResult> {
        tracing::info!(source = %request.source, "Cloning repository");
        let mut batch = CommandBatch::new();
        batch.append(self.git.command(&GitCommand::Clone {
            action: request.action().to_string(),
            source: request.source.clone(),
            destination: request.destination.clone(),
        }));
        batch.seal();
        let result = self.executor.execute(&mut batch)?;
        if !result.success {
            tracing::warn!(output = %result.output.trim(), "Clone reported failure");
        }
        Ok(result)
    }

    /// Reset, check out and pull every local branch, one batch per branch
    fn converge_branches(&self, destination: &Path) -> Result<()> {
        for_each_branch(&self.executor, &self.git, destination, |line| {
            let branch = sanitize(line);
            tracing::info!(%branch, destination = %destination.display(), "Updating branch");

            let mut batch = CommandBatch::new();
            self.queue_scoped(&mut batch, destination, &branch, false);
            self.queue_scoped(&mut batch, destination, &branch, true);
            let result = self.executor.execute(&mut batch)?;
            if !result.success {
                tracing::warn!(%branch, output = %result.output.trim(), "Branch update reported failure");
            }
            Ok(())
        })
    }

    fn checkout(&self, destination: &Path, branch: &str) -> Result<ExecutionResult> {
        tracing::info!(%branch, destination = %destination.display(), "Checking out branch");
        let mut batch = CommandBatch::new();
        self.queue_scoped(&mut batch, destination, branch, false);
        self.executor.execute(&mut batch)
    }

    /// Queue `[reset; checkout <branch>]`, or `[reset; checkout <branch>; pull]`
    /// when `pull` is set, as one sealed invocation inside `destination`
    ///
    /// The reset sequence leaves the baseline branch checked out, so the pull
    /// invocation checks `branch` out again before pulling. Without it every
    /// pull would update the baseline instead of `branch`.
    fn queue_scoped(&self, batch: &mut CommandBatch, destination: &Path, branch: &str, pull: bool) {
        batch.scope(destination);
        batch.extend(self.git.reset_sequence());
        batch.append(self.git.checkout(branch));
        if pull {
            batch.append(self.git.command(&GitCommand::Pull));
        }
        batch.seal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingExecutor;

    const PING_OK: &str = "4 packets transmitted, 4 packets received, 0.0% packet loss";
    const RESET: &str = "git clean -f; git reset --hard HEAD; git checkout master";

    fn connected() -> RecordingExecutor {
        RecordingExecutor::new().respond("ping", ExecutionResult::success(PING_OK))
    }

    fn checkout(dir: &Path, branch: &str) -> String {
        format!("cd {}; {}; git checkout {}", dir.display(), RESET, branch)
    }

    fn pull(dir: &Path, branch: &str) -> String {
        format!("cd {}; {}; git checkout {}; git pull", dir.display(), RESET, branch)
    }

    fn branch_list(dir: &Path) -> String {
        format!("cd {}; git branch", dir.display())
    }

    #[test]
    fn test_request_defaults() {
        let request = SyncRequest::new("/tmp/repo", "git@host:org/repo.git");
        assert_eq!(request.branch, "master");
        assert_eq!(request.action, "clone");
        assert!(request.validate().is_ok());

        let request = request.with_branch("").with_action(" ");
        assert_eq!(request.branch(), "master");
        assert_eq!(request.action(), "clone");
    }

    #[test]
    fn test_invalid_request_runs_nothing() {
        let executor = connected();
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let err = sync
            .sync_and_checkout(&SyncRequest::new("", "git@host:repo"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));

        let err = sync
            .sync_and_checkout(&SyncRequest::new("/tmp/repo", "  "))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn test_unreachable_host_fails_before_any_command() {
        let executor = RecordingExecutor::new()
            .respond("ping", ExecutionResult::failure("4 packets transmitted, 2 received, 50% packet loss"));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo");
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let err = sync
            .sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git"))
            .unwrap_err();

        match err {
            Error::Connectivity { remote } => assert_eq!(remote, "git@host:org/repo.git"),
            other => panic!("unexpected error: {other:?}"),
        }
        // Only the probe itself ran
        assert_eq!(executor.calls(), vec!["ping -c 4 host"]);
        assert!(!dest.exists());
    }

    #[test]
    fn test_malformed_remote_runs_nothing() {
        let executor = connected();
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let err = sync
            .sync_and_checkout(&SyncRequest::new("/tmp/repo", "not-a-remote"))
            .unwrap_err();
        assert!(matches!(err, Error::Connectivity { .. }));
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn test_fresh_clone_invocation_order() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo");
        let executor = connected()
            .respond("git branch", ExecutionResult::success("  main\n  release-1\n* dev\n"))
            .creating_clones();
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let request = SyncRequest::new(&dest, "git@host:org/repo.git").with_branch("release-1");
        let result = sync.sync_and_checkout(&request).unwrap();
        assert_eq!(result, dest);

        let expected = vec![
            "ping -c 4 host".to_string(),
            format!("git clone git@host:org/repo.git {}", dest.display()),
            branch_list(&dest),
            checkout(&dest, "main"),
            pull(&dest, "main"),
            checkout(&dest, "release-1"),
            pull(&dest, "release-1"),
            checkout(&dest, "dev"),
            pull(&dest, "dev"),
            checkout(&dest, "release-1"),
        ];
        assert_eq!(executor.calls(), expected);
    }

    #[test]
    fn test_existing_destination_is_not_cloned() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().to_path_buf();
        let executor = connected().respond("git branch", ExecutionResult::success("* master\n"));
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        sync.sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git"))
            .unwrap();

        let calls = executor.calls();
        assert!(calls.iter().all(|c| !c.contains(" clone ")));
        assert_eq!(
            calls[1..],
            [
                branch_list(&dest),
                checkout(&dest, "master"),
                pull(&dest, "master"),
                checkout(&dest, "master"),
            ]
        );
    }

    #[test]
    fn test_every_scoped_invocation_starts_with_reset() {
        for branches in ["", "* master\n", "a\nb\n* c\nd\ne\n"] {
            let dir = tempfile::tempdir().unwrap();
            let dest = dir.path().to_path_buf();
            let executor = connected().respond("git branch", ExecutionResult::success(branches));
            let sync = Synchronizer::new(&executor, &SyncConfig::default());

            sync.sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git"))
                .unwrap();

            let prefix = format!("cd {}; {}", dest.display(), RESET);
            let scoped: Vec<_> = executor
                .calls()
                .into_iter()
                .filter(|c| c.starts_with("cd ") && !c.ends_with("git branch"))
                .collect();
            let branch_count = branches.lines().filter(|l| !l.trim().is_empty()).count();
            assert_eq!(scoped.len(), branch_count * 2 + 1);
            assert!(scoped.iter().all(|c| c.starts_with(&prefix)), "{scoped:?}");
        }
    }

    #[test]
    fn test_final_failure_is_sync_error_even_if_destination_exists() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().to_path_buf();
        let executor = connected()
            .respond("git checkout missing", ExecutionResult::failure("error: pathspec 'missing' did not match"));
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let err = sync
            .sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git").with_branch("missing"))
            .unwrap_err();

        match err {
            Error::Sync(result) => {
                assert!(!result.success);
                assert!(result.output.contains("pathspec"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failed_branch_update_does_not_stop_convergence() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().to_path_buf();
        let executor = connected()
            .respond("git branch", ExecutionResult::success("  broken\n* master\n"))
            .respond(
                "git checkout broken; git pull",
                ExecutionResult::failure("fatal: couldn't find remote ref broken"),
            );
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let result = sync
            .sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git"))
            .unwrap();
        assert_eq!(result, dest);

        let calls = executor.calls();
        assert_eq!(
            calls[2..],
            [
                checkout(&dest, "broken"),
                pull(&dest, "broken"),
                checkout(&dest, "master"),
                pull(&dest, "master"),
                checkout(&dest, "master"),
            ]
        );
    }

    #[test]
    fn test_failed_clone_leaves_no_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo");
        let executor = connected()
            .respond(" clone ", ExecutionResult::failure("fatal: repository not found"));
        let sync = Synchronizer::new(&executor, &SyncConfig::default());

        let err = sync
            .sync_and_checkout(&SyncRequest::new(&dest, "git@host:org/repo.git"))
            .unwrap_err();
        assert!(matches!(err, Error::Sync(ref r) if r.output.contains("not found")));
        assert_eq!(executor.calls().len(), 2);
    }

    #[test]
    fn test_custom_baseline_and_action() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("repo");
        let config = SyncConfig {
            baseline_branch: "main".to_string(),
            ..SyncConfig::default()
        };
        let executor = connected().creating_clones();
        let sync = Synchronizer::new(&executor, &config);

        let request = SyncRequest::new(&dest, "git@host:org/repo.git")
            .with_action("clone --depth 1")
            .with_branch("main");
        sync.sync_and_checkout(&request).unwrap();

        let calls = executor.calls();
        assert_eq!(
            calls[1],
            format!("git clone --depth 1 git@host:org/repo.git {}", dest.display())
        );
        assert_eq!(
            calls.last().unwrap(),
            &format!(
                "cd {}; git clean -f; git reset --hard HEAD; git checkout main; git checkout main",
                dest.display()
            )
        );
    }
}
