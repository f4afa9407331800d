//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all)
//! yields the stock setup for the schedule sync project.
//!
//! # Example
//!
//! ```yaml
//! app_name: schedule-sync
//! system:
//!   manager: apt
//!   packages: [python3, python3-venv, python3-pip]
//!   sudo: auto
//! python:
//!   interpreter: python3
//!   venv_dir: venv
//!   manifest: requirements.txt
//! executables: [schedule_sync.py]
//! run_command: python schedule_sync.py
//! ```

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Name shown in the header.
    pub app_name: String,

    /// System package settings.
    pub system: SystemConfig,

    /// Virtual environment settings.
    pub python: PythonConfig,

    /// Files that get their executable bits set.
    pub executables: Vec<String>,

    /// Command suggested in the closing message.
    pub run_command: Option<String>,

    /// Output settings.
    pub settings: Settings,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            app_name: "schedule-sync".to_string(),
            system: SystemConfig::default(),
            python: PythonConfig::default(),
            executables: vec!["schedule_sync.py".to_string()],
            run_command: Some("python schedule_sync.py".to_string()),
            settings: Settings::default(),
        }
    }
}

/// System package manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Whether the index refresh and package install steps run at all.
    pub enabled: bool,

    /// Which package manager to drive.
    pub manager: PackageManagerKind,

    /// Packages to install.
    pub packages: Vec<String>,

    /// When to prefix package manager commands with `sudo`.
    pub sudo: SudoMode,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            manager: PackageManagerKind::Apt,
            packages: vec![
                "python3".to_string(),
                "python3-venv".to_string(),
                "python3-pip".to_string(),
            ],
            sudo: SudoMode::Auto,
        }
    }
}

/// Supported system package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    #[default]
    Apt,
    Dnf,
    Brew,
}

/// Privilege escalation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudoMode {
    /// Escalate unless already running as root.
    #[default]
    Auto,
    Always,
    Never,
}

/// Python virtual environment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythonConfig {
    /// Interpreter used to create the venv.
    pub interpreter: String,

    /// Venv directory, relative to the project root.
    pub venv_dir: String,

    /// Dependency manifest passed to `pip install -r`.
    pub manifest: String,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            venv_dir: "venv".to_string(),
            manifest: "requirements.txt".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Output mode used when no CLI flag overrides it.
    pub default_output: OutputMode,
}

/// Output mode as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}
