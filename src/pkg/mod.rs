mod apk;
pub mod suffix;

pub use apk::Apk;

use anyhow::Result;

/// Baseline package set for an Alpine WSL environment. Order is
/// irrelevant; apk deduplicates repeats.
pub const BASE_PACKAGES: &[&str] = &[
    "bash",
    "bash-completion",
    "coreutils",
    "curl",
    "doas",
    "git",
    "grep",
    "less",
    "mandoc",
    "openssh-client",
    "podman",
    "py3-pip",
    "shadow",
    "tar",
    "tzdata",
    "util-linux",
    "wget",
];

/// Package manager operations against the live system.
pub trait PackageManager: Send + Sync {
    /// Name of the package manager executable (e.g., "apk")
    fn name(&self) -> &str;

    /// Refresh the package index
    fn update(&self) -> Result<()>;

    /// Upgrade all installed packages
    fn upgrade(&self) -> Result<()>;

    /// Install packages in one batch
    fn install(&self, packages: &[&str]) -> Result<()>;

    /// Names of all currently installed packages
    fn installed(&self) -> Result<Vec<String>>;

    /// Whether a package with exactly this name exists in the repository index
    fn available(&self, package: &str) -> bool;
}
