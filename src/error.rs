//! Error types for setup operations.
//!
//! This module defines [`SetupError`], the error type used throughout the
//! crate, and a [`Result`] alias.
//!
//! Failures of external tools are not translated: the tool's exit code is
//! carried through [`SetupError::CommandFailed`] so the binary can exit with it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A step failed for a reason other than a tool's exit status.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// External command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command could not be started or waited on.
    #[error("Could not run {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SetupError {
    /// Process exit code that best represents this error.
    ///
    /// A tool's own non-zero status is passed through. Configuration
    /// problems exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
