use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::PackageManager;
use crate::cmd;

/// Repositories file, relative to the filesystem root.
pub const REPOSITORIES: &str = "etc/apk/repositories";

/// Rolling-release channel mirrors.
pub const EDGE_REPOS: &[&str] = &[
    "https://dl-cdn.alpinelinux.org/alpine/edge/main",
    "https://dl-cdn.alpinelinux.org/alpine/edge/community",
    "https://dl-cdn.alpinelinux.org/alpine/edge/testing",
];

/// Apk package manager (Alpine Linux), operating on the live system.
#[derive(Debug, Clone, Default)]
pub struct Apk;

impl Apk {
    pub fn new() -> Self {
        Self
    }

    /// Point apk at the edge channel. The repositories file is fully
    /// rewritten, not merged, so reruns converge on the same content.
    pub fn switch_channel(&self, root: &Path) -> Result<()> {
        let path = root.join(REPOSITORIES);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut content = String::new();
        for repo in EDGE_REPOS {
            content.push_str(repo);
            content.push('\n');
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        println!("✓ Switched repositories to the edge channel");
        Ok(())
    }
}

impl PackageManager for Apk {
    fn name(&self) -> &str {
        "apk"
    }

    fn update(&self) -> Result<()> {
        cmd::run("apk", ["update"])
    }

    fn upgrade(&self) -> Result<()> {
        cmd::run("apk", ["upgrade", "--available"])
    }

    fn install(&self, packages: &[&str]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let mut args: Vec<&str> = vec!["add", "--no-cache"];
        args.extend(packages);

        cmd::run("apk", args)
    }

    fn installed(&self) -> Result<Vec<String>> {
        let output = cmd::run_output("apk", ["info"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn available(&self, package: &str) -> bool {
        cmd::check("apk", ["info", "--quiet", package])
    }
}
