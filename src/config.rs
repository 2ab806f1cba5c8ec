//! Generated configuration files. Both are rewritten wholesale on every
//! run; nothing merges with previous content.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// WSL boot configuration, relative to the filesystem root.
pub const WSL_CONF: &str = "etc/wsl.conf";

/// doas privilege policy, relative to the filesystem root.
pub const DOAS_CONF: &str = "etc/doas.conf";

/// Render /etc/wsl.conf: boot OpenRC into the default runlevel and log
/// the given user in by default. The username is passed through as
/// received.
pub fn wsl_conf(user: &str) -> String {
    format!(
        "[boot]\n\
         command = \"/sbin/openrc default\"\n\
         \n\
         [user]\n\
         default={}\n",
        user
    )
}

/// Render /etc/doas.conf: the whole wheel group may escalate, and the
/// default user keeps their environment while doing so.
pub fn doas_conf(user: &str) -> String {
    format!(
        "permit persist :wheel\n\
         permit persist keepenv {}\n",
        user
    )
}

pub fn write_wsl_conf(root: &Path, user: &str) -> Result<()> {
    let path = root.join(WSL_CONF);
    write_file(&path, &wsl_conf(user))?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}

pub fn write_doas_conf(root: &Path, user: &str) -> Result<()> {
    let path = root.join(DOAS_CONF);
    write_file(&path, &doas_conf(user))?;

    // doas refuses group- or world-readable config.
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(&path, perms)?;

    println!("✓ Wrote {}", path.display());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
