//! Platform detection and PATH lookup.

use std::path::{Path, PathBuf};

/// Variables whose presence marks a CI environment.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ci_detected(|key| std::env::var_os(key).is_some())
}

fn ci_detected(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|key| is_set(key))
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Check whether a path has any execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a program by walking PATH entries in order.
///
/// Returns the first match that is a file and executable.
pub fn resolve_program(name: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the process PATH into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn resolve_program_prefers_earlier_entries() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        for dir in [&first, &second] {
            let tool = dir.path().join("pip");
            fs::write(&tool, "#!/bin/sh\n").unwrap();
            make_executable(&tool);
        }

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            resolve_program("pip", &entries),
            Some(first.path().join("pip"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn resolve_program_skips_non_executable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pip"), "").unwrap();

        assert_eq!(resolve_program("pip", &[dir.path().to_path_buf()]), None);
    }

    #[test]
    fn resolve_program_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_program("nope", &[dir.path().to_path_buf()]), None);
    }

    #[test]
    fn ci_detected_by_any_known_var() {
        assert!(ci_detected(|key| key == "CI"));
        assert!(ci_detected(|key| key == "JENKINS_URL"));
        assert!(!ci_detected(|_| false));
    }
}
