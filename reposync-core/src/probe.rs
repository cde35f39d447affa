//! Connectivity probing for remote hosts
//!
//! Before anything touches a working copy the remote host must answer a
//! fixed number of `ping` echo requests without loss. This only shows the
//! host is up; it says nothing about the git service or credentials.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::SyncConfig;
use crate::exec::{CommandLine, Executor, Invocation};
use crate::git::extract_host;

fn zero_loss_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|\s)0(?:\.0)?%\spacket\sloss").expect("loss pattern is valid")
    })
}

/// Whether ping output reports zero packet loss
pub fn reports_zero_loss(output: &str) -> bool {
    zero_loss_pattern().is_match(output)
}

/// Checks that the host behind a remote address is reachable
#[derive(Debug, Clone)]
pub struct Prober<E> {
    executor: E,
    ping_path: String,
    count: u32,
}

impl<E: Executor> Prober<E> {
    pub fn new(executor: E, config: &SyncConfig) -> Self {
        Self {
            executor,
            ping_path: config.ping_path.clone(),
            count: config.probe_count,
        }
    }

    fn probe_command(&self, host: &str) -> CommandLine {
        CommandLine::new(&self.ping_path)
            .arg("-c")
            .arg(self.count.to_string())
            .arg(host)
    }

    /// Probe the host of `remote`
    ///
    /// Addresses without a host are never probed and count as unreachable.
    pub fn is_connected(&self, remote: &str) -> bool {
        let host = extract_host(remote);
        if host.is_empty() {
            tracing::info!(remote, "No host in remote address, skipping probe");
            return false;
        }

        match self
            .executor
            .run_now(&Invocation::single(self.probe_command(&host)))
        {
            Ok(output) => {
                let connected = reports_zero_loss(&output);
                if !connected {
                    tracing::warn!(%host, "Host did not answer every echo request");
                }
                connected
            }
            Err(e) => {
                tracing::warn!(%host, error = %e, "Failed to run connectivity probe");
                false
            }
        }
    }
}
