//! Integration tests for config module public API.

use devsetup::config::{
    load_config, load_merged_config, validate, OutputMode, PackageManagerKind, SetupConfig,
    SudoMode,
};
use devsetup::SetupError;
use std::fs;
use tempfile::TempDir;

#[test]
fn defaults_without_any_file() {
    let temp = TempDir::new().unwrap();
    let config = load_merged_config(temp.path()).unwrap();

    assert_eq!(config, SetupConfig::default());
    assert!(validate(&config).is_ok());
}

#[test]
fn layered_config_workflow() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".devsetup");
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("config.yml"),
        r#"
app_name: schedule-sync
system:
  manager: apt
  packages: [python3, python3-venv, python3-pip, chromium-driver]
python:
  manifest: requirements/base.txt
settings:
  default_output: verbose
"#,
    )
    .unwrap();

    fs::write(
        dir.join("config.local.yml"),
        r#"
system:
  sudo: never
settings:
  default_output: quiet
"#,
    )
    .unwrap();

    let config = load_merged_config(temp.path()).unwrap();

    assert_eq!(config.system.manager, PackageManagerKind::Apt);
    assert_eq!(config.system.sudo, SudoMode::Never);
    assert_eq!(config.system.packages.len(), 4);
    assert_eq!(config.python.manifest, "requirements/base.txt");
    assert_eq!(config.python.venv_dir, "venv");
    assert_eq!(config.settings.default_output, OutputMode::Quiet);
}

#[test]
fn unknown_keys_are_parse_errors() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("c.yml"), "pyton:\n  venv_dir: venv\n").unwrap();

    let explicit = temp.path().join("c.yml");
    let result = load_config(temp.path(), Some(explicit.as_path()));
    assert!(matches!(result, Err(SetupError::ConfigParseError { .. })));
}
