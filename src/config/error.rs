//! Configuration validation errors

use thiserror::Error;

/// Result alias for configuration resolution
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// A configuration value failed validation.
///
/// Every message names the variable or value at fault. Errors raised by a
/// database driver are never converted into this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingVariable(&'static str),

    #[error("Unsupported {variable}: {value}")]
    UnsupportedDatabaseType { variable: &'static str, value: String },

    #[error("Invalid value for {variable}: {value}")]
    InvalidValue { variable: &'static str, value: String },
}
