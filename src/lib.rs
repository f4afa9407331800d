//! devsetup - Bootstrap the local development environment.
//!
//! Replaces the project's `setup.sh`: refreshes the system package
//! index, installs system packages, creates a Python virtual
//! environment, installs the dependency manifest into it, marks the sync
//! script executable, and prints what to do next.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and the setup command
//! - [`config`] - Configuration defaults, loading, and validation
//! - [`error`] - Error types and result aliases
//! - [`shell`] - External process execution
//! - [`steps`] - The setup steps and their sequential executor
//! - [`system`] - System package manager commands
//! - [`ui`] - Terminal output and spinners
//! - [`venv`] - Virtual environment layout and activation
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use devsetup::config::SetupConfig;
//! use devsetup::steps::{plan, PlanOptions};
//!
//! let options = PlanOptions { skip_system: true, is_root: false };
//! let steps = plan(&SetupConfig::default(), Path::new("/work/sync"), &options);
//! assert_eq!(steps[0].command_line().as_deref(), Some("python3 -m venv venv"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod steps;
pub mod system;
pub mod ui;
pub mod venv;

pub use error::{Result, SetupError};
