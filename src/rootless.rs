//! Rootless container plumbing: kernel module and subordinate-ID ranges.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// First subordinate ID handed to the user.
pub const SUBID_START: u32 = 100000;

/// Size of the subordinate-ID range.
pub const SUBID_COUNT: u32 = 65536;

pub const MODULES: &str = "etc/modules";
pub const SUBUID: &str = "etc/subuid";
pub const SUBGID: &str = "etc/subgid";

/// Set up rootless container support for a user: load the tun module at
/// boot and grant a subordinate UID/GID range.
///
/// Every call appends; rerunning provisioning duplicates the lines.
/// Callers must not pass "root" - the orchestrator skips this step for
/// the root user.
pub fn setup(root: &Path, user: &str) -> Result<()> {
    append_line(&root.join(MODULES), "tun")?;

    let range = subid_range(user);
    append_line(&root.join(SUBUID), &range)?;
    append_line(&root.join(SUBGID), &range)?;

    println!("✓ Rootless container support configured for {}", user);
    Ok(())
}

/// One `user:start:count` mapping line.
pub fn subid_range(user: &str) -> String {
    format!("{}:{}:{}", user, SUBID_START, SUBID_COUNT)
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    writeln!(file, "{}", line).with_context(|| format!("Failed to append to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(root: &Path, rel: &str) -> Vec<String> {
        fs::read_to_string(root.join(rel))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn setup_appends_one_range_line_per_file() {
        let root = tempfile::tempdir().unwrap();
        setup(root.path(), "bob").unwrap();

        assert_eq!(lines(root.path(), SUBUID), vec!["bob:100000:65536"]);
        assert_eq!(lines(root.path(), SUBGID), vec!["bob:100000:65536"]);
        assert_eq!(lines(root.path(), MODULES), vec!["tun"]);
    }

    #[test]
    fn setup_preserves_existing_entries() {
        let root = tempfile::tempdir().unwrap();
        let subuid = root.path().join(SUBUID);
        fs::create_dir_all(subuid.parent().unwrap()).unwrap();
        fs::write(&subuid, "alice:100000:65536\n").unwrap();

        setup(root.path(), "bob").unwrap();

        assert_eq!(
            lines(root.path(), SUBUID),
            vec!["alice:100000:65536", "bob:100000:65536"]
        );
    }

    #[test]
    fn rerun_duplicates_lines() {
        // Known idempotence gap: appends are unconditional.
        let root = tempfile::tempdir().unwrap();
        setup(root.path(), "bob").unwrap();
        setup(root.path(), "bob").unwrap();

        assert_eq!(
            lines(root.path(), SUBUID),
            vec!["bob:100000:65536", "bob:100000:65536"]
        );
        assert_eq!(lines(root.path(), MODULES), vec!["tun", "tun"]);
    }

    #[test]
    fn subid_range_format() {
        assert_eq!(subid_range("bob"), "bob:100000:65536");
    }
}
