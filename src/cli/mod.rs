//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap's derive macros
//! - [`setup`] - The setup command itself

pub mod args;
pub mod setup;

pub use args::Cli;
pub use setup::{CommandResult, SetupCommand};
