//! CLI interface and argument parsing
//!
//! This module parses the command line, sets up logging and runs the
//! requested task. Shell completion scripts are generated on request.

pub mod app;

// Re-export main types
pub use app::*;
