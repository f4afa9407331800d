//! devsetup CLI entry point.

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use devsetup::cli::{Cli, SetupCommand};
use devsetup::shell::is_ci;
use devsetup::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Console level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, leaving the terminal to the UI
///
/// With `--log-file`, records at INFO and above (DEBUG with `--debug`)
/// are appended to that file as well.
fn init_tracing(debug: bool, color: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let console_filter = if debug {
        EnvFilter::new("devsetup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devsetup=warn"))
    };

    let console = fmt::layer()
        .with_target(false)
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file_layer, open_result) = match log_file {
        Some(path) => match File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open {}", path.display()))
        {
            Ok(file) => {
                let level = if debug { "devsetup=debug" } else { "devsetup=info" };
                let layer = fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(level));
                (Some(layer), Ok(()))
            }
            Err(e) => (None, Err(e)),
        },
        None => (None, Ok(())),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    open_result
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let log_result = init_tracing(cli.debug, !cli.no_color, cli.log_file.as_deref());
    tracing::debug!("devsetup starting with args: {:?}", cli);

    let project_root = cli
        .project
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let is_interactive = console::Term::stdout().is_term() && !is_ci();
    let command = SetupCommand::new(&project_root, cli.clone());

    let config = match command.load_config() {
        Ok(config) => config,
        Err(e) => {
            let mut ui = create_ui(is_interactive, OutputMode::Normal);
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(e.exit_code().clamp(1, 255) as u8);
        }
    };

    let mut ui = create_ui(is_interactive, command.output_mode(&config));

    if let Err(e) = log_result {
        ui.warning(&format!("Could not open log file: {:#}", e));
    }

    let result = command.execute(&config, ui.as_mut());
    ExitCode::from(result.exit_code.clamp(0, 255) as u8)
}
