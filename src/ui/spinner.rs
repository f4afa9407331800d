//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::shell::{OutputCallback, OutputLine};

use super::theme::SetupTheme;
use super::SpinnerHandle;

/// A spinner shown while a step's command runs.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: SetupTheme,
}

impl ProgressSpinner {
    /// Create and start a spinner.
    pub fn new(message: &str, theme: SetupTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template(spinner_template(&theme))
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, theme }
    }

    /// A spinner that draws nothing (silent mode, non-TTY).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: SetupTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

fn spinner_template(theme: &SetupTheme) -> &'static str {
    if theme.is_colored() {
        "{spinner:.cyan} {msg}"
    } else {
        "{spinner} {msg}"
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

/// Output callback that shows the latest output line under the spinner.
///
/// Long lines are cut to `max_width` characters so the spinner stays on
/// two terminal rows.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    max_width: usize,
) -> OutputCallback {
    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s.trim(),
        };
        if text.is_empty() {
            return;
        }
        let shown: String = text.chars().take(max_width).collect();
        bar.set_message(format!("{}\n  {}", base_message, shown));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes_without_panic() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("working");
        spinner.finish_success("done");
        assert!(spinner.progress_bar().unwrap().is_finished());
    }

    #[test]
    fn plain_theme_spinner_has_no_color() {
        assert_eq!(spinner_template(&SetupTheme::plain()), "{spinner} {msg}");
        assert_eq!(spinner_template(&SetupTheme::new()), "{spinner:.cyan} {msg}");
    }

    #[test]
    fn live_output_shows_latest_line_truncated() {
        let bar = ProgressBar::hidden();
        let callback = live_output_callback(bar.clone(), "Installing".into(), 5);

        callback(OutputLine::Stdout("Collecting requests".into()));
        assert_eq!(bar.message(), "Installing\n  Colle");

        callback(OutputLine::Stderr("   ".into()));
        assert_eq!(bar.message(), "Installing\n  Colle");
    }
}
