//! Remote address parsing

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@([^@:]+):").expect("host pattern is valid"))
}

/// Extract `host` from an scp-style address such as `git@host:org/repo.git`
///
/// Returns an empty string when the address has no `user@host:` part.
pub fn extract_host(remote: &str) -> String {
    host_pattern()
        .captures(remote)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Repository name of a remote address: its last path component without `.git`
///
/// `git@host:org/repo.git` gives `repo`.
pub fn repository_name(remote: &str) -> String {
    let trimmed = remote.trim().trim_end_matches('/');
    let base = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = base.strip_suffix(".git").unwrap_or(base);

    // Fall back to whatever the filesystem thinks the basename is
    if name.is_empty() {
        return Path::new(trimmed)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    name.to_string()
}
