//! Configuration validation rules.
//!
//! - Package names are non-empty and contain no whitespace
//! - The interpreter is non-empty
//! - `venv_dir`, `manifest`, and executables are non-empty relative paths

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};
use std::path::Path;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Config field the error applies to.
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &SetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for package in &config.system.packages {
        if package.trim().is_empty() {
            errors.push(ValidationError::new(
                "system.packages",
                "Package names must not be empty",
            ));
        } else if package.contains(char::is_whitespace) {
            errors.push(ValidationError::new(
                "system.packages",
                format!("Package name '{}' contains whitespace", package),
            ));
        }
    }

    if config.python.interpreter.trim().is_empty() {
        errors.push(ValidationError::new(
            "python.interpreter",
            "Interpreter must not be empty",
        ));
    }

    check_relative(&mut errors, "python.venv_dir", &config.python.venv_dir);
    check_relative(&mut errors, "python.manifest", &config.python.manifest);
    for file in &config.executables {
        check_relative(&mut errors, "executables", file);
    }

    errors
}

fn check_relative(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(
            field,
            format!("'{}' must not be empty", field),
        ));
    } else if Path::new(value).is_absolute() {
        errors.push(ValidationError::new(
            field,
            format!(
                "'{}' must be relative to the project root, got '{}'",
                field, value
            ),
        ));
    }
}

/// Validate and return an error describing every problem found.
pub fn validate(config: &SetupConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SetupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
