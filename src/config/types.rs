//! Core configuration types
//!
//! This module defines the data structures that represent a homestead
//! configuration file. The same shape is read from YAML, TOML or JSON.

use serde::Deserialize;
use std::collections::HashMap;

/// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

/// A positional statement: a command, an environment assignment, a link or a template
pub type Statement = Vec<String>;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Schema version (only version 1 exists)
    #[serde(default = "default_version", alias = "Version")]
    pub version: u32,

    /// Tasks defined in the configuration
    #[serde(default, alias = "Tasks")]
    pub tasks: HashMap<String, Task>,

    /// Command macros defined in the configuration
    #[serde(default, alias = "Macros")]
    pub macros: HashMap<String, Macro>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    /// Tasks to run before this one
    #[serde(default, alias = "Deps")]
    pub deps: Vec<String>,

    /// Environment statements: `[NAME]` unsets, `[NAME, value...]` sets
    #[serde(default, alias = "Envs")]
    pub envs: Vec<Statement>,

    /// Commands run before the main commands
    #[serde(default, alias = "cmdspre", alias = "CmdsPre")]
    pub cmds_pre: Vec<Statement>,

    /// Main commands
    #[serde(default, alias = "Cmds")]
    pub cmds: Vec<Statement>,

    /// Commands run after links and templates
    #[serde(default, alias = "cmdspost", alias = "CmdsPost")]
    pub cmds_post: Vec<Statement>,

    /// Symlinks: `[dst]`, `[dst, src]` or `[dst, src, mode]`
    #[serde(default, alias = "Links")]
    pub links: Vec<Statement>,

    /// Templates, same shape as links
    #[serde(default, alias = "Templates")]
    pub templates: Vec<Statement>,

    /// Every accept command must succeed for the task to run
    #[serde(default, alias = "Accepts")]
    pub accepts: Vec<Statement>,

    /// Any succeeding reject command skips the task
    #[serde(default, alias = "Rejects")]
    pub rejects: Vec<Statement>,

    /// Encrypted files revealed before the task body runs
    #[serde(default, alias = "Secrets")]
    pub secrets: Vec<String>,
}

/// A command macro definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Macro {
    /// Tasks to run before any task that uses this macro
    #[serde(default, alias = "Deps")]
    pub deps: Vec<String>,

    /// Arguments placed before the caller's arguments
    #[serde(default, alias = "Prefix")]
    pub prefix: Vec<String>,

    /// Arguments placed after the caller's arguments
    #[serde(default, alias = "Suffix")]
    pub suffix: Vec<String>,
}
