//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and records every
//! interaction for later assertion.
//!
//! # Example
//!
//! ```
//! use devsetup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Starting setup");
//! ui.success("Done!");
//!
//! assert!(ui.messages().contains(&"Starting setup".to_string()));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::sync::{Arc, Mutex};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// How a recorded spinner finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinnerOutcome {
    Running,
    Success(String),
    Error(String),
    Skipped(String),
}

/// A spinner started through the mock, with its final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    pub message: String,
    pub outcome: SpinnerOutcome,
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    steps: Vec<(usize, usize, String)>,
    commands: Vec<String>,
    spinners: Arc<Mutex<Vec<SpinnerRecord>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Step announcements as `(current, total, description)`.
    pub fn steps(&self) -> &[(usize, usize, String)] {
        &self.steps
    }

    /// Commands echoed through `show_command`.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Snapshot of all spinners started so far.
    pub fn spinners(&self) -> Vec<SpinnerRecord> {
        self.spinners.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Whether any captured text (in any channel) contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .chain(&self.commands)
            .any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_step(&mut self, current: usize, total: usize, description: &str) {
        self.steps.push((current, total, description.to_string()));
    }

    fn show_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let index = match self.spinners.lock() {
            Ok(mut records) => {
                records.push(SpinnerRecord {
                    message: message.to_string(),
                    outcome: SpinnerOutcome::Running,
                });
                records.len() - 1
            }
            Err(_) => 0,
        };
        Box::new(MockSpinner {
            records: Arc::clone(&self.spinners),
            index,
        })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner handle that writes its outcome back into the owning mock.
pub struct MockSpinner {
    records: Arc<Mutex<Vec<SpinnerRecord>>>,
    index: usize,
}

impl MockSpinner {
    fn finish(&mut self, outcome: SpinnerOutcome) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(self.index) {
                record.outcome = outcome;
            }
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(self.index) {
                record.message = msg.to_string();
            }
        }
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Success(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Error(msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Skipped(msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_messages_by_channel() {
        let mut ui = MockUI::new();
        ui.message("plain");
        ui.warning("careful");
        ui.error("broken");

        assert_eq!(ui.messages(), ["plain"]);
        assert_eq!(ui.warnings(), ["careful"]);
        assert_eq!(ui.errors(), ["broken"]);
        assert!(ui.contains("brok"));
    }

    #[test]
    fn records_steps_and_commands() {
        let mut ui = MockUI::new();
        ui.show_step(1, 8, "Refresh package index");
        ui.show_command("apt-get update");

        assert_eq!(ui.steps()[0], (1, 8, "Refresh package index".to_string()));
        assert_eq!(ui.commands(), ["apt-get update"]);
    }

    #[test]
    fn spinner_outcome_is_recorded() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Installing");
        assert_eq!(ui.spinners()[0].outcome, SpinnerOutcome::Running);

        spinner.finish_skipped("Already installed");
        assert_eq!(
            ui.spinners()[0].outcome,
            SpinnerOutcome::Skipped("Already installed".to_string())
        );
    }

    #[test]
    fn with_mode_sets_mode() {
        let ui = MockUI::with_mode(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
        assert!(!ui.is_interactive());
    }
}
