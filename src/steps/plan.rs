//! Building the step list from configuration.

use std::path::Path;

use crate::config::SetupConfig;
use crate::system::PackageManager;
use crate::venv::VirtualEnv;

use super::Step;

/// Options that shape the plan independently of the config file.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Leave out the index refresh and package install steps.
    pub skip_system: bool,

    /// Whether the process already runs as root (decides `sudo`).
    pub is_root: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            skip_system: false,
            is_root: crate::shell::is_elevated(),
        }
    }
}

/// Build the ordered list of steps for a run.
///
/// The order never changes; only the system steps can be left out.
pub fn plan(config: &SetupConfig, project_root: &Path, options: &PlanOptions) -> Vec<Step> {
    let mut steps = Vec::with_capacity(8);

    if config.system.enabled && !options.skip_system {
        let manager = PackageManager::with_elevation(&config.system, options.is_root);
        steps.push(Step::UpdateIndex {
            command: manager.update_index(),
        });
        steps.push(Step::InstallPackages {
            command: manager.install(&config.system.packages),
            packages: config.system.packages.clone(),
        });
    }

    let venv = VirtualEnv::new(project_root, &config.python.venv_dir);

    steps.push(Step::CreateVenv {
        command: venv.create_command(&config.python.interpreter),
        venv: venv.clone(),
    });
    steps.push(Step::Activate { venv: venv.clone() });
    steps.push(Step::InstallManifest {
        manifest: config.python.manifest.clone(),
    });
    steps.push(Step::MarkExecutable {
        files: config.executables.clone(),
    });
    steps.push(Step::Deactivate);
    steps.push(Step::Instructions {
        lines: closing_lines(config, &venv),
    });

    steps
}

/// The closing instructions printed after a successful run.
pub fn closing_lines(config: &SetupConfig, venv: &VirtualEnv) -> Vec<String> {
    let mut lines = vec![
        "To start working, activate the virtual environment:".to_string(),
        format!("  {}", venv.activate_hint()),
    ];
    if let Some(run) = &config.run_command {
        lines.push("Then run:".to_string());
        lines.push(format!("  {}", run));
    }
    lines
}
