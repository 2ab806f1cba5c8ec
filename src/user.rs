//! Default-user account management and optional extras.

use anyhow::Result;

use crate::cmd;

/// Login shell handed to the default user.
pub const LOGIN_SHELL: &str = "/bin/bash";

/// Administrative group whose members may escalate via doas.
pub const ADMIN_GROUP: &str = "wheel";

pub fn exists(user: &str) -> bool {
    cmd::check("id", [user])
}

/// Create the account if missing and put it in the wheel group. Adding
/// an existing member makes adduser exit non-zero; that is not worth
/// failing the step over.
pub fn ensure_user(user: &str) -> Result<()> {
    if exists(user) {
        println!("✓ User {} already exists", user);
    } else {
        cmd::run("adduser", ["-D", user])?;
        println!("✓ Created user {}", user);
    }

    if let Err(e) = cmd::run("adduser", [user, ADMIN_GROUP]) {
        tracing::debug!("adduser {} {}: {}", user, ADMIN_GROUP, e);
    }

    Ok(())
}

/// Prompt for a password and set it via chpasswd. Empty input skips the
/// step without error.
pub fn set_password(user: &str) -> Result<()> {
    let prompt = format!("Password for {} (empty to skip): ", user);
    let password = rpassword::prompt_password(prompt)?;

    if password.is_empty() {
        println!("✓ Password unchanged");
        return Ok(());
    }

    let entry = format!("{}:{}\n", user, password);
    cmd::run_with_stdin("chpasswd", [] as [&str; 0], entry.as_bytes())?;

    println!("✓ Password set for {}", user);
    Ok(())
}

pub fn set_shell(user: &str) -> Result<()> {
    cmd::run("chsh", ["-s", LOGIN_SHELL, user])
}

/// Optional extra: podman-compose from PyPI. Edge's Python is PEP 668
/// managed, so pip needs the override flag.
pub fn install_compose() -> Result<()> {
    cmd::run(
        "pip3",
        ["install", "--break-system-packages", "podman-compose"],
    )
}
