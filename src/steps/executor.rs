//! Sequential step execution.
//!
//! Steps run strictly in order. Each external tool's failure is reported
//! as-is (exit code and tail of its output) and ends the run; there is no
//! retry or rollback.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::shell::{CommandOptions, CommandResult, Invocation, ProcessRunner};
use crate::ui::{live_output_callback, UserInterface};
use crate::venv::Activation;

use super::permissions::mark_executable;
use super::{RunReport, Step, StepOutcome, StepResult};

/// Lines of tool output shown when a step fails.
const FAILURE_TAIL_LINES: usize = 15;

/// Width of the live output line under a spinner.
const LIVE_OUTPUT_WIDTH: usize = 72;

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Directory commands run in and relative paths resolve against.
    pub project_root: PathBuf,

    /// Report what would run without running anything.
    pub dry_run: bool,
}

/// Executes a plan one step at a time.
pub struct Executor<R: ProcessRunner> {
    runner: R,
    options: ExecutionOptions,
    activation: Option<Activation>,
}

impl<R: ProcessRunner> Executor<R> {
    /// Create an executor around a process runner.
    pub fn new(runner: R, options: ExecutionOptions) -> Self {
        Self {
            runner,
            options,
            activation: None,
        }
    }

    /// The process runner, for inspection after a run.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether a venv overlay is currently applied.
    pub fn is_activated(&self) -> bool {
        self.activation.is_some()
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[Step], ui: &mut dyn UserInterface) -> RunReport {
        let mut report = RunReport {
            results: Vec::with_capacity(steps.len()),
            dry_run: self.options.dry_run,
        };
        let total = steps.len();

        for (index, step) in steps.iter().enumerate() {
            ui.show_step(index + 1, total, step.description());
            tracing::info!(step = step.name(), "Starting step {}/{}", index + 1, total);

            let start = Instant::now();
            let outcome = if self.options.dry_run {
                self.preview(step, ui)
            } else {
                self.execute(step, ui)
            };
            let duration = start.elapsed();

            tracing::info!(step = step.name(), ?duration, "Step {}", outcome);

            let failed = outcome.is_failure();
            report.results.push(StepResult {
                name: step.name(),
                outcome,
                duration,
            });

            if failed {
                break;
            }
        }

        report
    }

    fn preview(&mut self, step: &Step, ui: &mut dyn UserInterface) -> StepOutcome {
        if let Some(command) = step.command_line() {
            ui.show_command(&command);
        }
        if let Step::Instructions { lines } = step {
            for line in lines {
                ui.message(line);
            }
        }
        StepOutcome::Skipped {
            reason: "dry run".to_string(),
        }
    }

    fn execute(&mut self, step: &Step, ui: &mut dyn UserInterface) -> StepOutcome {
        match step {
            Step::UpdateIndex { command } => self.run_tool(step, command, ui),

            Step::InstallPackages { command, packages } => {
                if packages.is_empty() {
                    return skipped(ui, step, "no packages configured");
                }
                self.run_tool(step, command, ui)
            }

            Step::CreateVenv { venv, command } => {
                if venv.exists() {
                    return skipped(
                        ui,
                        step,
                        &format!("{} already exists", venv.root().display()),
                    );
                }
                self.run_tool(step, command, ui)
            }

            Step::Activate { venv } => {
                let activation = venv.activation();
                tracing::debug!("Activation overlay: {:?}", activation.vars);
                self.activation = Some(activation);
                completed(ui, step, Duration::ZERO)
            }

            Step::InstallManifest { manifest } => {
                let pip = self
                    .activation
                    .as_ref()
                    .and_then(|a| a.resolve("pip"))
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "pip".to_string());
                let command = Invocation::new(pip, ["install", "-r", manifest.as_str()]);
                self.run_tool(step, &command, ui)
            }

            Step::MarkExecutable { files } => {
                for file in files {
                    let path = self.options.project_root.join(file);
                    if let Err(e) = mark_executable(&path) {
                        let message = match e.kind() {
                            std::io::ErrorKind::NotFound => format!("{} not found", file),
                            _ => format!("cannot change permissions of {}: {}", file, e),
                        };
                        ui.error(&format!("{}: {}", step.description(), message));
                        return StepOutcome::Failed {
                            exit_code: None,
                            command: None,
                            message,
                        };
                    }
                    tracing::debug!("Marked {} executable", path.display());
                }
                completed(ui, step, Duration::ZERO)
            }

            Step::Deactivate => {
                if self.activation.take().is_none() {
                    return skipped(ui, step, "no environment active");
                }
                completed(ui, step, Duration::ZERO)
            }

            Step::Instructions { lines } => {
                ui.message("");
                ui.success("Setup complete!");
                for line in lines {
                    ui.message(line);
                }
                StepOutcome::Completed
            }
        }
    }

    fn command_options(&self, capture: bool) -> CommandOptions {
        let mut options = CommandOptions {
            cwd: Some(self.options.project_root.clone()),
            capture,
            ..Default::default()
        };
        if let Some(activation) = &self.activation {
            activation.apply(&mut options);
        }
        options
    }

    /// Run an external tool for `step` and map its result to an outcome.
    ///
    /// Output is streamed straight through in verbose mode and for `sudo`
    /// commands on a terminal, where a password prompt may appear.
    /// Otherwise it is captured behind a spinner and shown only on failure.
    fn run_tool(
        &mut self,
        step: &Step,
        command: &Invocation,
        ui: &mut dyn UserInterface,
    ) -> StepOutcome {
        let passthrough = ui.output_mode().shows_command_output()
            || (command.program == "sudo" && ui.is_interactive());

        let result = if passthrough {
            ui.show_command(&command.to_string());
            let options = self.command_options(false);
            self.runner.run(command, &options)
        } else {
            let options = self.command_options(true);
            let mut spinner = ui.start_spinner(step.description());
            let result = match spinner.progress_bar() {
                Some(bar) => {
                    let callback =
                        live_output_callback(bar, step.description().to_string(), LIVE_OUTPUT_WIDTH);
                    self.runner.run_streaming(command, &options, callback)
                }
                None => self.runner.run(command, &options),
            };
            match &result {
                Ok(r) if r.success => spinner.finish_success(&with_duration(step, r.duration)),
                _ => spinner.finish_error(step.description()),
            }
            result
        };

        match result {
            Ok(r) if r.success => {
                if passthrough {
                    ui.success(&with_duration(step, r.duration));
                }
                StepOutcome::Completed
            }
            Ok(r) => tool_failure(ui, step, command, &r, !passthrough),
            Err(e) => {
                let message = e.to_string();
                ui.error(&format!("{}: {}", step.description(), message));
                StepOutcome::Failed {
                    exit_code: None,
                    command: Some(command.to_string()),
                    message,
                }
            }
        }
    }
}

fn tool_failure(
    ui: &mut dyn UserInterface,
    step: &Step,
    command: &Invocation,
    result: &CommandResult,
    show_output: bool,
) -> StepOutcome {
    let message = match result.exit_code {
        Some(code) => format!("{} exited with code {}", command, code),
        None => format!("{} was terminated by a signal", command),
    };

    ui.error(&format!("{} failed: {}", step.description(), message));
    if show_output {
        for line in result.output_tail(FAILURE_TAIL_LINES) {
            ui.message(&format!("  │ {}", line));
        }
    }

    StepOutcome::Failed {
        exit_code: result.exit_code,
        command: Some(command.to_string()),
        message,
    }
}

fn completed(ui: &mut dyn UserInterface, step: &Step, duration: Duration) -> StepOutcome {
    let mut spinner = ui.start_spinner(step.description());
    spinner.finish_success(&with_duration(step, duration));
    StepOutcome::Completed
}

fn skipped(ui: &mut dyn UserInterface, step: &Step, reason: &str) -> StepOutcome {
    let mut spinner = ui.start_spinner(step.description());
    spinner.finish_skipped(&format!("{} ({})", step.description(), reason));
    StepOutcome::Skipped {
        reason: reason.to_string(),
    }
}

fn with_duration(step: &Step, duration: Duration) -> String {
    if duration.is_zero() {
        step.description().to_string()
    } else {
        format!("{} ({})", step.description(), format_duration(duration))
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
