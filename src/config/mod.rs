//! Configuration loading, layering, and validation.
//!
//! Configuration is optional. Without any file the built-in defaults
//! reproduce the stock setup; `.devsetup/config.yml` and
//! `.devsetup/config.local.yml` adjust it.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{deep_merge, load_config, load_config_file, load_merged_config, ConfigPaths};
pub use schema::{
    OutputMode, PackageManagerKind, PythonConfig, Settings, SetupConfig, SudoMode, SystemConfig,
};
pub use validator::{validate, validate_config, ValidationError};
