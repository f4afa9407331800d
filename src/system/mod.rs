//! System package manager commands.
//!
//! Builds the index-refresh and install invocations for the configured
//! package manager, prefixed with `sudo` according to the escalation
//! policy.

use crate::config::{PackageManagerKind, SudoMode, SystemConfig};
use crate::shell::Invocation;

/// A package manager plus the escalation decision for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    kind: PackageManagerKind,
    escalate: bool,
}

impl PackageManager {
    /// Resolve from config with an explicit "already root" flag.
    pub fn with_elevation(config: &SystemConfig, is_root: bool) -> Self {
        let escalate = match (config.manager, config.sudo) {
            // Homebrew refuses to run as root
            (PackageManagerKind::Brew, _) => false,
            (_, SudoMode::Always) => true,
            (_, SudoMode::Never) => false,
            (_, SudoMode::Auto) => !is_root,
        };
        Self {
            kind: config.manager,
            escalate,
        }
    }

    /// Whether commands are run through `sudo`.
    pub fn escalates(&self) -> bool {
        self.escalate
    }

    /// Command that refreshes the package index.
    pub fn update_index(&self) -> Invocation {
        let inv = match self.kind {
            PackageManagerKind::Apt => Invocation::new("apt-get", ["update"]),
            PackageManagerKind::Dnf => Invocation::new("dnf", ["makecache"]),
            PackageManagerKind::Brew => Invocation::new("brew", ["update"]),
        };
        self.wrap(inv)
    }

    /// Command that installs `packages`.
    pub fn install(&self, packages: &[String]) -> Invocation {
        let mut inv = match self.kind {
            PackageManagerKind::Apt => Invocation::new("apt-get", ["install", "-y"]),
            PackageManagerKind::Dnf => Invocation::new("dnf", ["install", "-y"]),
            PackageManagerKind::Brew => Invocation::new("brew", ["install"]),
        };
        inv.args.extend(packages.iter().cloned());
        self.wrap(inv)
    }

    fn wrap(&self, inv: Invocation) -> Invocation {
        if self.escalate {
            inv.prefixed("sudo")
        } else {
            inv
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(manager: PackageManagerKind, sudo: SudoMode) -> SystemConfig {
        SystemConfig {
            manager,
            sudo,
            ..Default::default()
        }
    }

    #[test]
    fn apt_as_regular_user_uses_sudo() {
        let pm = PackageManager::with_elevation(&SystemConfig::default(), false);

        assert!(pm.escalates());
        assert_eq!(pm.update_index().to_string(), "sudo apt-get update");
        assert_eq!(
            pm.install(&SystemConfig::default().packages).to_string(),
            "sudo apt-get install -y python3 python3-venv python3-pip"
        );
    }

    #[test]
    fn apt_as_root_skips_sudo() {
        let pm = PackageManager::with_elevation(&SystemConfig::default(), true);

        assert!(!pm.escalates());
        assert_eq!(pm.update_index().program, "apt-get");
    }

    #[test]
    fn sudo_always_escalates_even_as_root() {
        let pm = PackageManager::with_elevation(&config(PackageManagerKind::Apt, SudoMode::Always), true);
        assert_eq!(pm.update_index().program, "sudo");
    }

    #[test]
    fn sudo_never_does_not_escalate() {
        let pm = PackageManager::with_elevation(&config(PackageManagerKind::Dnf, SudoMode::Never), false);
        assert_eq!(pm.update_index().to_string(), "dnf makecache");
        assert_eq!(
            pm.install(&["git".to_string()]).to_string(),
            "dnf install -y git"
        );
    }

    #[test]
    fn brew_is_never_escalated() {
        let pm = PackageManager::with_elevation(&config(PackageManagerKind::Brew, SudoMode::Always), false);

        assert!(!pm.escalates());
        assert_eq!(
            pm.install(&["python@3.12".to_string()]).to_string(),
            "brew install python@3.12"
        );
    }
}
