//! Python virtual environment layout and activation.
//!
//! Activation cannot change the parent shell, so it is modelled as an
//! environment overlay applied to every child process started while the
//! venv is active. Deactivating drops the overlay.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::shell::{CommandOptions, Invocation};

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";

/// A virtual environment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
    relative: String,
}

impl VirtualEnv {
    /// Describe the venv at `venv_dir` under `project_root`.
    pub fn new(project_root: &Path, venv_dir: &str) -> Self {
        Self {
            root: project_root.join(venv_dir),
            relative: venv_dir.to_string(),
        }
    }

    /// Absolute venv root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the venv's executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// The venv's Python interpreter.
    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(format!("python{}", EXE_SUFFIX))
    }

    /// Whether the venv already exists with a usable interpreter.
    pub fn exists(&self) -> bool {
        self.python().exists()
    }

    /// Command creating this venv with `interpreter`.
    pub fn create_command(&self, interpreter: &str) -> Invocation {
        Invocation::new(interpreter, ["-m", "venv", self.relative.as_str()])
    }

    /// The shell command a user runs to activate this venv.
    pub fn activate_hint(&self) -> String {
        if cfg!(windows) {
            format!("{}\\{}\\activate", self.relative, BIN_DIR)
        } else {
            format!("source {}/{}/activate", self.relative, BIN_DIR)
        }
    }

    /// Activation overlay, mirroring what the `activate` script exports.
    pub fn activation(&self) -> Activation {
        let mut entries = vec![self.bin_dir()];
        entries.extend(crate::shell::parse_system_path());
        let path = std::env::join_paths(&entries).unwrap_or_else(|_| OsString::from(""));

        let mut vars = HashMap::new();
        vars.insert(
            "VIRTUAL_ENV".to_string(),
            self.root.to_string_lossy().to_string(),
        );
        vars.insert("PATH".to_string(), path.to_string_lossy().to_string());

        Activation {
            vars,
            removed: vec!["PYTHONHOME".to_string()],
            path_entries: entries,
        }
    }
}

/// Environment changes applied while a venv is active.
#[derive(Debug, Clone, Default)]
pub struct Activation {
    /// Variables set for child processes.
    pub vars: HashMap<String, String>,
    /// Variables removed for child processes.
    pub removed: Vec<String>,
    /// PATH entries in lookup order, venv first.
    pub path_entries: Vec<PathBuf>,
}

impl Activation {
    /// Apply this overlay to command options.
    pub fn apply(&self, options: &mut CommandOptions) {
        options
            .env
            .extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        options.env_remove.extend(self.removed.iter().cloned());
    }

    /// Resolve `program` against the activated PATH.
    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        let name = format!("{}{}", program, EXE_SUFFIX);
        crate::shell::resolve_program(&name, &self.path_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_under_project_root() {
        let venv = VirtualEnv::new(Path::new("/proj"), "venv");

        assert_eq!(venv.root(), Path::new("/proj/venv"));
        assert!(venv.python().starts_with("/proj/venv"));
        assert!(venv.bin_dir().starts_with("/proj/venv"));
    }

    #[test]
    fn exists_requires_interpreter() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path(), "venv");
        assert!(!venv.exists());

        std::fs::create_dir_all(venv.root()).unwrap();
        assert!(!venv.exists());

        std::fs::create_dir_all(venv.bin_dir()).unwrap();
        std::fs::write(venv.python(), "").unwrap();
        assert!(venv.exists());
    }

    #[test]
    fn create_command_uses_relative_dir() {
        let venv = VirtualEnv::new(Path::new("/proj"), "venv");
        assert_eq!(
            venv.create_command("python3").to_string(),
            "python3 -m venv venv"
        );
    }

    #[test]
    #[cfg(unix)]
    fn activate_hint_sources_script() {
        let venv = VirtualEnv::new(Path::new("/proj"), ".venv");
        assert_eq!(venv.activate_hint(), "source .venv/bin/activate");
    }

    #[test]
    fn activation_sets_virtual_env_and_path() {
        let venv = VirtualEnv::new(Path::new("/proj"), "venv");
        let activation = venv.activation();

        assert_eq!(
            activation.vars.get("VIRTUAL_ENV").map(String::as_str),
            Some(&*venv.root().to_string_lossy())
        );
        assert_eq!(activation.path_entries[0], venv.bin_dir());
        assert!(activation.vars["PATH"].starts_with(&*venv.bin_dir().to_string_lossy()));
        assert_eq!(activation.removed, vec!["PYTHONHOME"]);
    }

    #[test]
    fn apply_merges_into_options() {
        let venv = VirtualEnv::new(Path::new("/proj"), "venv");
        let mut options = CommandOptions::default();
        venv.activation().apply(&mut options);

        assert!(options.env.contains_key("VIRTUAL_ENV"));
        assert!(options.env.contains_key("PATH"));
        assert!(options.env_remove.contains(&"PYTHONHOME".to_string()));
    }

    #[test]
    #[cfg(unix)]
    fn resolve_prefers_venv_bin() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path(), "venv");
        std::fs::create_dir_all(venv.bin_dir()).unwrap();
        let pip = venv.bin_dir().join("pip");
        std::fs::write(&pip, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&pip, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(venv.activation().resolve("pip"), Some(pip));
    }
}
