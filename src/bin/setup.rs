use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

use wslpine::preflight;
use wslpine::provision::{Provisioner, DEFAULT_USER};

/// Environment fallback for the target username.
const USER_ENV: &str = "WSLPINE_USER";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let user = args
        .get(1)
        .cloned()
        .or_else(|| env::var(USER_ENV).ok())
        .unwrap_or_else(|| DEFAULT_USER.to_string());

    if let Err(e) = preflight::check("apk") {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("\n=== Alpine WSL Setup ===\n");
    println!("Provisioning for user: {}", user);

    let provisioner = Provisioner::new(&user);
    if let Err(e) = provisioner.run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"wslpine-setup - first-boot provisioning for Alpine Linux on WSL

Usage:
    wslpine-setup [username]

The username defaults to ${} from the environment, then "{}".
Must be run as root inside an Alpine WSL distribution.

What it does:
    - switches apk to the edge channel and upgrades the system
    - installs the base package set (bash, podman, doas, ...)
    - installs missing -doc and -bash-completion companions
    - writes /etc/wsl.conf and /etc/doas.conf
    - enables the cgroups and dbus services
    - configures rootless podman (subuid/subgid, tun module)
    - creates the user, sets shell and password, installs podman-compose
"#,
        USER_ENV, DEFAULT_USER
    );
}
