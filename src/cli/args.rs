//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// devsetup - Bootstrap the local development environment.
///
/// Refreshes system packages, creates the Python virtual environment,
/// installs dependencies, and marks the sync script executable.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "devsetup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (skips .devsetup/ discovery)
    #[arg(short, long, env = "DEVSETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Stream command output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Show the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip refreshing and installing system packages
    #[arg(long)]
    pub skip_system: bool,

    /// Also write log records to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_args_parses_to_defaults() {
        let cli = Cli::try_parse_from(["devsetup"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.skip_system);
        assert!(cli.project.is_none());
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "devsetup",
            "--dry-run",
            "--skip-system",
            "-v",
            "--project",
            "/tmp/proj",
            "--log-file",
            "setup.log",
        ])
        .unwrap();

        assert!(cli.dry_run);
        assert!(cli.skip_system);
        assert!(cli.verbose);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/proj")));
        assert_eq!(cli.log_file, Some(PathBuf::from("setup.log")));
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["devsetup", "-v", "-q"]).is_err());
    }

    #[test]
    fn rejects_subcommands() {
        assert!(Cli::try_parse_from(["devsetup", "run"]).is_err());
    }
}
