//! File permission changes.

use std::io;
use std::path::Path;

/// Add the execute bit for user, group, and other (`chmod +x`).
///
/// Fails with `NotFound` if the file does not exist.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions)
}

/// Windows has no execute bit; only existence is checked.
#[cfg(not(unix))]
pub fn mark_executable(path: &Path) -> io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn sets_execute_bits_and_keeps_others() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("schedule_sync.py");
        fs::write(&file, "print('hi')\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        mark_executable(&file).unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o751);
    }

    #[test]
    fn is_idempotent() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("run.sh");
        fs::write(&file, "").unwrap();

        mark_executable(&file).unwrap();
        mark_executable(&file).unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = mark_executable(&temp.path().join("missing.py")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
