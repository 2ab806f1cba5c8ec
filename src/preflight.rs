use std::fs;
use std::path::Path;

use thiserror::Error;

/// Where the distribution identifies itself.
pub const OS_RELEASE: &str = "/etc/os-release";

/// A failed environment check. All of these abort provisioning before
/// any mutation happens.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("must be run as root")]
    NotRoot,

    #[error("unsupported distribution {0:?} (Alpine Linux required)")]
    WrongDistro(String),

    #[error("package manager {0:?} not found in PATH")]
    MissingPackageManager(String),
}

/// Verify the environment before touching anything: effective root, an
/// Alpine `/etc/os-release`, and the package manager on PATH - in that
/// order.
pub fn check(pkg_manager: &str) -> Result<(), PreflightError> {
    if !nix::unistd::Uid::effective().is_root() {
        return Err(PreflightError::NotRoot);
    }

    let id = os_id(Path::new(OS_RELEASE)).unwrap_or_default();
    if id != "alpine" {
        return Err(PreflightError::WrongDistro(id));
    }

    if which::which(pkg_manager).is_err() {
        return Err(PreflightError::MissingPackageManager(pkg_manager.into()));
    }

    Ok(())
}

/// Extract the `ID=` value from an os-release file, stripping optional
/// quotes. `None` when the file or the key is missing.
pub fn os_id(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            return Some(value.trim().trim_matches('"').to_string());
        }
    }

    None
}
