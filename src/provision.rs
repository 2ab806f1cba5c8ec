//! Top-level provisioning sequence.
//!
//! Steps run strictly top to bottom. Each carries a policy: a Fatal
//! step's failure aborts the run, a Recoverable step's failure prints a
//! warning and execution moves on, leaving whatever partial state the
//! step produced.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config;
use crate::pkg::{suffix, Apk, PackageManager, BASE_PACKAGES};
use crate::rootless;
use crate::services;
use crate::user;

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Fallback username when neither the argument nor the environment
/// supplies one.
pub const DEFAULT_USER: &str = "wsl";

/// Companion-package suffixes resolved after the base install.
pub const SUFFIXES: &[&str] = &["bash-completion", "doc"];

/// How a step's failure affects the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    Fatal,
    Recoverable,
}

struct Step {
    name: &'static str,
    policy: StepPolicy,
    run: fn(&Provisioner) -> Result<()>,
}

pub struct Provisioner {
    user: String,
    root: PathBuf,
    apk: Apk,
}

impl Provisioner {
    pub fn new(user: &str) -> Self {
        Self::with_root(user, Path::new("/"))
    }

    /// Target a filesystem prefix other than `/`. Tests point this at a
    /// tempdir; the package manager still runs against the live system.
    pub fn with_root(user: &str, root: &Path) -> Self {
        Self {
            user: user.to_string(),
            root: root.to_path_buf(),
            apk: Apk::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Rootless container setup is meaningless for root itself.
    pub fn wants_rootless(&self) -> bool {
        self.user != "root"
    }

    fn steps() -> &'static [Step] {
        const STEPS: &[Step] = &[
            Step {
                name: "Switch repositories to edge",
                policy: StepPolicy::Recoverable,
                run: |p| p.apk.switch_channel(&p.root),
            },
            Step {
                name: "Update and upgrade system",
                policy: StepPolicy::Recoverable,
                run: |p| {
                    p.apk.update()?;
                    p.apk.upgrade()
                },
            },
            Step {
                name: "Install base packages",
                policy: StepPolicy::Fatal,
                run: |p| p.apk.install(BASE_PACKAGES),
            },
            Step {
                name: "Install companion packages",
                policy: StepPolicy::Recoverable,
                run: |p| {
                    for sfx in SUFFIXES.iter().copied() {
                        suffix::install_missing(&p.apk, sfx)?;
                    }
                    Ok(())
                },
            },
            Step {
                name: "Create default user",
                policy: StepPolicy::Recoverable,
                run: |p| user::ensure_user(&p.user),
            },
            Step {
                name: "Write WSL boot configuration",
                policy: StepPolicy::Recoverable,
                run: |p| config::write_wsl_conf(&p.root, &p.user),
            },
            Step {
                name: "Write doas policy",
                policy: StepPolicy::Recoverable,
                run: |p| config::write_doas_conf(&p.root, &p.user),
            },
            Step {
                name: "Enable services",
                policy: StepPolicy::Recoverable,
                run: |_| services::enable_all(),
            },
            Step {
                name: "Configure rootless containers",
                policy: StepPolicy::Recoverable,
                run: |p| {
                    if !p.wants_rootless() {
                        println!("Skipping rootless setup for root");
                        return Ok(());
                    }
                    rootless::setup(&p.root, &p.user)
                },
            },
            Step {
                name: "Set login shell",
                policy: StepPolicy::Recoverable,
                run: |p| user::set_shell(&p.user),
            },
            Step {
                name: "Set user password",
                policy: StepPolicy::Recoverable,
                run: |p| user::set_password(&p.user),
            },
            Step {
                name: "Install podman-compose",
                policy: StepPolicy::Recoverable,
                run: |_| user::install_compose(),
            },
        ];
        STEPS
    }

    /// Run the full sequence. Returns Ok even when Recoverable steps
    /// warned; only a Fatal step's failure propagates.
    pub fn run(&self) -> Result<()> {
        let steps = Self::steps();
        let total = steps.len();

        for (i, step) in steps.iter().enumerate() {
            println!("\n[{}/{}] {}...", i + 1, total, step.name);
            apply_policy(step.policy, step.name, (step.run)(self))?;
        }

        println!("\n✓ Provisioning complete for user {}", self.user);
        println!("  Restart the distribution for wsl.conf to take effect.");
        Ok(())
    }
}

/// Convert a step result according to its policy: Recoverable failures
/// become a printed warning and Ok, Fatal failures propagate.
fn apply_policy(policy: StepPolicy, name: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => match policy {
            StepPolicy::Fatal => Err(e).with_context(|| format!("{} failed", name)),
            StepPolicy::Recoverable => {
                println!("{}Warning: {}: {:#}{}", YELLOW, name, e, RESET);
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn recoverable_failure_becomes_ok() {
        let result = apply_policy(StepPolicy::Recoverable, "step", Err(anyhow!("boom")));
        assert!(result.is_ok());
    }

    #[test]
    fn fatal_failure_propagates_with_step_name() {
        let result = apply_policy(StepPolicy::Fatal, "Install base packages", Err(anyhow!("boom")));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Install base packages failed"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn warned_steps_do_not_stop_the_sequence() {
        let outcomes: Vec<Result<()>> = vec![Err(anyhow!("first")), Ok(()), Err(anyhow!("third"))];

        let mut reached = 0;
        for outcome in outcomes {
            if apply_policy(StepPolicy::Recoverable, "step", outcome).is_err() {
                break;
            }
            reached += 1;
        }

        assert_eq!(reached, 3);
    }

    #[test]
    fn rootless_is_skipped_for_root() {
        assert!(!Provisioner::new("root").wants_rootless());
        assert!(Provisioner::new("bob").wants_rootless());
    }

    #[test]
    fn exactly_one_step_is_fatal() {
        let fatal: Vec<_> = Provisioner::steps()
            .iter()
            .filter(|s| s.policy == StepPolicy::Fatal)
            .map(|s| s.name)
            .collect();
        assert_eq!(fatal, vec!["Install base packages"]);
    }

    #[test]
    fn default_user_is_not_root() {
        assert_ne!(DEFAULT_USER, "root");
    }
}
