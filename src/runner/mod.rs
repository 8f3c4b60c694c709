//! Task execution engine
//!
//! This module resolves task and macro names, runs commands and predicates,
//! installs links and templates, and walks the dependency graph.

pub mod command;
pub mod context;
pub mod environment;
pub mod expand;
pub mod install;
pub mod macros;
pub mod operator;
pub mod predicate;
pub mod resolve;
pub mod retry;
pub mod secret;
pub mod task;
pub mod template;

// Re-export main types
pub use command::*;
pub use context::*;
pub use environment::*;
pub use expand::*;
pub use install::*;
pub use macros::*;
pub use operator::*;
pub use predicate::*;
pub use resolve::*;
pub use retry::*;
pub use secret::*;
pub use task::*;
pub use template::*;
