//! The setup command.
//!
//! Loads configuration, builds the plan, and runs it against real
//! processes.

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::{load_config, SetupConfig};
use crate::error::Result;
use crate::shell::{ProcessRunner, SystemRunner};
use crate::steps::{plan, ExecutionOptions, Executor, PlanOptions};
use crate::ui::{OutputMode, UserInterface};

/// Result of running the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Bootstraps the development environment for one project.
pub struct SetupCommand {
    project_root: PathBuf,
    args: Cli,
}

impl SetupCommand {
    /// Create the command for a project root.
    ///
    /// A relative root is made absolute against the current directory,
    /// since tools run with the root as their working directory.
    pub fn new(project_root: &Path, args: Cli) -> Self {
        let project_root =
            std::path::absolute(project_root).unwrap_or_else(|_| project_root.to_path_buf());
        Self { project_root, args }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load configuration per the CLI flags.
    pub fn load_config(&self) -> Result<SetupConfig> {
        load_config(&self.project_root, self.args.config.as_deref())
    }

    /// Output mode: CLI flags win over the config default.
    pub fn output_mode(&self, config: &SetupConfig) -> OutputMode {
        if self.args.quiet {
            OutputMode::Quiet
        } else if self.args.verbose {
            OutputMode::Verbose
        } else {
            config.settings.default_output.into()
        }
    }

    fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            skip_system: self.args.skip_system,
            ..Default::default()
        }
    }

    /// Run setup with real processes.
    pub fn execute(&self, config: &SetupConfig, ui: &mut dyn UserInterface) -> CommandResult {
        self.execute_with(config, SystemRunner, &self.plan_options(), ui)
    }

    /// Run setup with a given process runner and plan options.
    pub fn execute_with<R: ProcessRunner>(
        &self,
        config: &SetupConfig,
        runner: R,
        plan_options: &PlanOptions,
        ui: &mut dyn UserInterface,
    ) -> CommandResult {
        ui.show_header(&config.app_name);

        if self.args.dry_run {
            ui.message("Running in dry-run mode; no commands will be executed.");
            ui.message("");
        }

        let steps = plan(config, &self.project_root, plan_options);
        tracing::debug!(
            "Planned steps: {:?}",
            steps.iter().map(|s| s.name()).collect::<Vec<_>>()
        );

        let mut executor = Executor::new(
            runner,
            ExecutionOptions {
                project_root: self.project_root.clone(),
                dry_run: self.args.dry_run,
            },
        );

        match executor.run(&steps, ui).into_result() {
            Ok(report) => {
                tracing::info!(
                    "Setup finished in {:?} ({} steps)",
                    report.total_duration(),
                    report.results.len()
                );
                CommandResult::success()
            }
            Err(e) => {
                tracing::info!("Setup failed: {}", e);
                CommandResult::failure(e.exit_code())
            }
        }
    }
}
