//! Companion-package resolution: for every installed package, install the
//! `-doc` / `-bash-completion` sibling when the repository carries one.

use anyhow::Result;
use std::collections::HashSet;

use super::PackageManager;

/// Reduce a package name to its base token: the longest leading run of
/// lowercase letters and hyphens, with trailing hyphens stripped. The
/// grammar is `[a-z-]+[a-z]`, so the token is at least two characters
/// and ends in a letter.
///
/// Names that do not start with such a run (digits, uppercase) yield
/// `None` and are skipped by the resolver. That means those packages
/// never get a companion even when one exists; intentional-or-not, it
/// matches the original provisioning behavior.
pub fn base_token(name: &str) -> Option<&str> {
    let end = name
        .find(|c: char| !c.is_ascii_lowercase() && c != '-')
        .unwrap_or(name.len());

    let token = name[..end].trim_end_matches('-');
    if token.len() < 2 {
        return None;
    }

    Some(token)
}

/// Compute the batch of `<base>-<suffix>` packages to install, given the
/// installed set and a repository-existence predicate. Pure so tests can
/// drive it without apk.
pub fn missing_suffix_packages<F>(installed: &[String], suffix: &str, mut available: F) -> Vec<String>
where
    F: FnMut(&str) -> bool,
{
    let tail = format!("-{}", suffix);
    let have: HashSet<&str> = installed.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for name in installed {
        // Suffix packages themselves are not bases for further suffixing.
        if name.ends_with(&tail) {
            continue;
        }

        let Some(base) = base_token(name) else {
            continue;
        };

        let candidate = format!("{}{}", base, tail);
        if !seen.insert(candidate.clone()) {
            continue;
        }
        if have.contains(candidate.as_str()) {
            continue;
        }

        if available(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Install every missing `-<suffix>` companion in one batch.
pub fn install_missing(pm: &dyn PackageManager, suffix: &str) -> Result<()> {
    let installed = pm.installed()?;
    let candidates = missing_suffix_packages(&installed, suffix, |name| pm.available(name));

    if candidates.is_empty() {
        println!("✓ No missing -{} packages", suffix);
        return Ok(());
    }

    println!(
        "Installing {} missing -{} package(s)...",
        candidates.len(),
        suffix
    );

    let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
    pm.install(&refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn base_token_plain_name() {
        assert_eq!(base_token("curl"), Some("curl"));
    }

    #[test]
    fn base_token_hyphenated_name() {
        assert_eq!(base_token("openssh-client"), Some("openssh-client"));
    }

    #[test]
    fn base_token_strips_trailing_version() {
        assert_eq!(base_token("zlib1g"), Some("zlib"));
    }

    #[test]
    fn base_token_stops_at_digit_inside_name() {
        // Digits terminate the run, so py3-pip reduces to just "py".
        assert_eq!(base_token("py3-pip"), Some("py"));
    }

    #[test]
    fn base_token_rejects_uppercase_start() {
        assert_eq!(base_token("R2"), None);
        assert_eq!(base_token("Xorg"), None);
    }

    #[test]
    fn base_token_trims_trailing_hyphens() {
        assert_eq!(base_token("foo-2.1"), Some("foo"));
    }

    #[test]
    fn base_token_rejects_single_letter_and_empty() {
        assert_eq!(base_token("a"), None);
        assert_eq!(base_token(""), None);
        assert_eq!(base_token("--"), None);
        assert_eq!(base_token("7zip"), None);
    }

    #[test]
    fn resolver_skips_packages_already_carrying_the_suffix() {
        let set = installed(&["curl", "curl-doc", "git"]);
        let out = missing_suffix_packages(&set, "doc", |_| true);
        // curl-doc is installed, so curl needs nothing; git gets its sibling.
        assert_eq!(out, vec!["git-doc"]);
    }

    #[test]
    fn resolver_proposes_missing_sibling() {
        let set = installed(&["curl"]);
        let out = missing_suffix_packages(&set, "doc", |name| name == "curl-doc");
        assert_eq!(out, vec!["curl-doc"]);
    }

    #[test]
    fn resolver_respects_repository_absence() {
        let set = installed(&["musl", "busybox"]);
        let out = missing_suffix_packages(&set, "doc", |name| name == "busybox-doc");
        assert_eq!(out, vec!["busybox-doc"]);
    }

    #[test]
    fn resolver_deduplicates_reduced_bases() {
        // Both reduce to base "py", so the candidate appears once.
        let set = installed(&["py3-pip", "py3-setuptools"]);
        let out = missing_suffix_packages(&set, "doc", |_| true);
        assert_eq!(out, vec!["py-doc"]);
    }

    #[test]
    fn resolver_silently_skips_unreducible_names() {
        let set = installed(&["7zip", "curl"]);
        let out = missing_suffix_packages(&set, "doc", |_| true);
        assert_eq!(out, vec!["curl-doc"]);
    }

    #[test]
    fn resolver_handles_bash_completion_suffix() {
        let set = installed(&["git", "git-bash-completion", "curl"]);
        let out = missing_suffix_packages(&set, "bash-completion", |name| {
            name == "curl-bash-completion" || name == "git-bash-completion"
        });
        assert_eq!(out, vec!["curl-bash-completion"]);
    }
}
