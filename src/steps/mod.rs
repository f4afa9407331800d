//! The setup procedure: steps, planning, and sequential execution.
//!
//! A run is a fixed list of [`Step`]s built by [`plan`] and executed in
//! order by [`Executor`]. The first failing step ends the run.

pub mod executor;
pub mod permissions;
pub mod plan;

pub use executor::{ExecutionOptions, Executor};
pub use permissions::mark_executable;
pub use plan::{plan, PlanOptions};

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SetupError};
use crate::shell::Invocation;
use crate::venv::VirtualEnv;

/// One step of the setup procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Refresh the system package index.
    UpdateIndex { command: Invocation },
    /// Install system packages. Skipped when `packages` is empty.
    InstallPackages {
        command: Invocation,
        packages: Vec<String>,
    },
    /// Create the virtual environment unless it already exists.
    CreateVenv {
        venv: VirtualEnv,
        command: Invocation,
    },
    /// Apply the venv's activation overlay to subsequent commands.
    Activate { venv: VirtualEnv },
    /// `pip install -r <manifest>` inside the active venv.
    InstallManifest { manifest: String },
    /// Set the executable bits on each file.
    MarkExecutable { files: Vec<String> },
    /// Drop the activation overlay.
    Deactivate,
    /// Print the closing instructions.
    Instructions { lines: Vec<String> },
}

impl Step {
    /// Stable identifier used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateIndex { .. } => "update_index",
            Self::InstallPackages { .. } => "install_packages",
            Self::CreateVenv { .. } => "create_venv",
            Self::Activate { .. } => "activate",
            Self::InstallManifest { .. } => "install_manifest",
            Self::MarkExecutable { .. } => "mark_executable",
            Self::Deactivate => "deactivate",
            Self::Instructions { .. } => "instructions",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UpdateIndex { .. } => "Refresh system package index",
            Self::InstallPackages { .. } => "Install system packages",
            Self::CreateVenv { .. } => "Create virtual environment",
            Self::Activate { .. } => "Activate virtual environment",
            Self::InstallManifest { .. } => "Install Python dependencies",
            Self::MarkExecutable { .. } => "Mark scripts executable",
            Self::Deactivate => "Deactivate virtual environment",
            Self::Instructions { .. } => "Show next steps",
        }
    }

    /// The equivalent shell command, for display and dry runs.
    pub fn command_line(&self) -> Option<String> {
        match self {
            Self::UpdateIndex { command }
            | Self::InstallPackages { command, .. }
            | Self::CreateVenv { command, .. } => Some(command.to_string()),
            Self::Activate { venv } => Some(venv.activate_hint()),
            Self::InstallManifest { manifest } => {
                Some(Invocation::new("pip", ["install", "-r", manifest.as_str()]).to_string())
            }
            Self::MarkExecutable { files } => {
                let args = std::iter::once("+x").chain(files.iter().map(String::as_str));
                Some(Invocation::new("chmod", args).to_string())
            }
            Self::Deactivate => Some("deactivate".to_string()),
            Self::Instructions { .. } => None,
        }
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped {
        reason: String,
    },
    Failed {
        /// The tool's exit code, when a tool ran and reported one.
        exit_code: Option<i32>,
        /// The command that failed, when the failure came from a tool.
        command: Option<String>,
        message: String,
    },
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Skipped { reason } => write!(f, "skipped ({})", reason),
            Self::Failed { message, .. } => write!(f, "failed: {}", message),
        }
    }
}

/// Result of executing one step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: &'static str,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

/// Results of a whole run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub results: Vec<StepResult>,
    pub dry_run: bool,
}

impl RunReport {
    /// True when no step failed.
    pub fn success(&self) -> bool {
        self.failure().is_none()
    }

    /// The failing step, if any. Always the last one executed.
    pub fn failure(&self) -> Option<&StepResult> {
        self.results.iter().find(|r| r.outcome.is_failure())
    }

    /// Outcome for a step by name.
    pub fn outcome(&self, name: &str) -> Option<&StepOutcome> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// Total time spent across steps.
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Convert a failed run into the matching error.
    pub fn into_result(self) -> Result<Self> {
        let error = match self.failure() {
            Some(StepResult {
                outcome:
                    StepOutcome::Failed {
                        command: Some(command),
                        exit_code: Some(code),
                        ..
                    },
                ..
            }) => Some(SetupError::CommandFailed {
                command: command.clone(),
                code: Some(*code),
            }),
            Some(StepResult {
                name,
                outcome: StepOutcome::Failed { message, .. },
                ..
            }) => Some(SetupError::StepFailed {
                step: name.to_string(),
                message: message.clone(),
            }),
            _ => None,
        };

        match error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
