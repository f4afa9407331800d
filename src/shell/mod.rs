//! External process execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_streaming, CommandOptions, CommandResult, Invocation, OutputCallback,
    OutputLine, ProcessRunner, SystemRunner,
};
pub use platform::{is_ci, is_elevated, is_executable, parse_system_path, resolve_program};
