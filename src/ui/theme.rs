//! Visual theme and styling.

use console::Style;

/// Terminal styles for setup output.
#[derive(Debug, Clone)]
pub struct SetupTheme {
    /// Success lines (green).
    pub success: Style,
    /// Warnings (yellow).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Secondary text.
    pub dim: Style,
    /// Headers (cyan bold).
    pub header: Style,
    /// Step counters like `[3/8]`.
    pub step_number: Style,
    /// Commands echoed in output.
    pub command: Style,
    colored: bool,
}

impl Default for SetupTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            step_number: Style::new().dim(),
            command: Style::new().dim().italic(),
            colored: true,
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            step_number: Style::new(),
            command: Style::new(),
            colored: false,
        }
    }

    /// Whether this theme emits colors.
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Pick colored or plain based on the environment.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a step line: `[3/8] Create virtual environment`.
    pub fn format_step(&self, current: usize, total: usize, description: &str) -> String {
        format!(
            "{} {}",
            self.step_number.apply_to(format!("[{}/{}]", current, total)),
            description
        )
    }

    pub fn format_command(&self, command: &str) -> String {
        format!("{}", self.command.apply_to(format!("$ {}", command)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("==> {}", title)))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    colors_wanted(
        std::env::var_os("NO_COLOR").is_some(),
        console::Term::stdout().is_term(),
    )
}

fn colors_wanted(no_color: bool, is_term: bool) -> bool {
    !no_color && is_term
}
