//! OpenRC service registration via rc-update.

use anyhow::Result;

use crate::cmd;

/// Services added to the boot runlevel.
pub const BOOT_SERVICES: &[&str] = &["cgroups"];

/// Services added to the default runlevel.
pub const DEFAULT_SERVICES: &[&str] = &["dbus"];

/// Register the provisioned services with OpenRC. rc-update exits
/// non-zero when a service is already in the runlevel, so reruns surface
/// as a warning from the orchestrator rather than an error here.
pub fn enable_all() -> Result<()> {
    for service in BOOT_SERVICES.iter().copied() {
        cmd::run("rc-update", ["add", service, "boot"])?;
    }

    for service in DEFAULT_SERVICES.iter().copied() {
        cmd::run("rc-update", ["add", service, "default"])?;
    }

    Ok(())
}
