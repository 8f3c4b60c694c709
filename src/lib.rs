//! Homestead - a declarative task runner for bootstrapping machines
//!
//! Tasks declare dependencies, environment changes, commands, symlinks and
//! templates. Homestead runs a task and everything it depends on exactly
//! once, prompting the operator when an operation fails or would destroy
//! existing files.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{HomesteadError, Result};

/// Current version of Homestead
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
