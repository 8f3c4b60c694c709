//! Error types for Homestead

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Homestead operations
pub type Result<T> = std::result::Result<T, HomesteadError>;

/// Main error type for Homestead
#[derive(Error, Debug)]
pub enum HomesteadError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Unsupported configuration version {0} (expected 1)")]
    UnsupportedVersion(u32),

    #[error("Task '{task}' has an invalid {field} statement at position {index}: {reason}")]
    InvalidStatement {
        task: String,
        field: &'static str,
        index: usize,
        reason: String,
    },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("task or variant not found: {0}")]
    TaskNotFound(String),

    #[error("macro or variant not found: {0}")]
    MacroNotFound(String),

    #[error("macro expansion too deep while expanding '{0}'")]
    MacroRecursion(String),

    #[error("invalid {0} statement")]
    InvalidStatement(&'static str),

    #[error("invalid file mode '{0}'")]
    InvalidMode(String),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command '{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("source path {0} does not exist in filesystem")]
    SourceMissing(PathBuf),

    #[error("{action} {path}: {source}")]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render template {path}: {message}")]
    Template { path: PathBuf, message: String },

    #[error("secret '{name}' could not be revealed: {message}")]
    Secret { name: String, message: String },

    #[error("failed to read operator input: {0}")]
    Prompt(#[source] io::Error),
}

impl ExecutionError {
    /// Attach a path and the attempted action to a filesystem error
    pub fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExecutionError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
