//! Configuration validation
//!
//! Statement arity and link modes are checked here, once, so the engine
//! never sees a malformed statement from a configuration file.

use crate::config::types::{Config, Statement, Task, SCHEMA_VERSION};
use crate::error::{ConfigError, ConfigResult};
use crate::runner::LinkStatement;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.version != SCHEMA_VERSION {
        return Err(ConfigError::UnsupportedVersion(config.version));
    }

    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    for (name, mac) in &config.macros {
        if mac.deps.iter().any(|dep| dep.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Macro '{}' has an empty dependency name",
                name
            )));
        }
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    if task.deps.iter().any(|dep| dep.is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "Task '{}' has an empty dependency name",
            name
        )));
    }

    validate_non_empty(name, "envs", &task.envs)?;
    validate_non_empty(name, "cmds_pre", &task.cmds_pre)?;
    validate_non_empty(name, "cmds", &task.cmds)?;
    validate_non_empty(name, "cmds_post", &task.cmds_post)?;
    validate_non_empty(name, "accepts", &task.accepts)?;
    validate_non_empty(name, "rejects", &task.rejects)?;
    parse_links(name, "links", &task.links)?;
    parse_links(name, "templates", &task.templates)?;

    Ok(())
}

fn validate_non_empty(task: &str, field: &'static str, statements: &[Statement]) -> ConfigResult<()> {
    for (index, statement) in statements.iter().enumerate() {
        if statement.is_empty() {
            return Err(ConfigError::InvalidStatement {
                task: task.to_string(),
                field,
                index,
                reason: "statement is empty".to_string(),
            });
        }
    }
    Ok(())
}

/// Parse the link or template statements of a task
pub fn parse_links(
    task: &str,
    field: &'static str,
    statements: &[Statement],
) -> ConfigResult<Vec<LinkStatement>> {
    statements
        .iter()
        .enumerate()
        .map(|(index, statement)| {
            LinkStatement::parse(statement).map_err(|e| ConfigError::InvalidStatement {
                task: task.to_string(),
                field,
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
