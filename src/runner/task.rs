//! Task execution types and logic
//!
//! This module contains the runtime representation of tasks and the
//! depth-first executor that runs a task after its dependencies.

use crate::config::{self, parse_links, validate_config, Statement};
use crate::error::{ConfigResult, ExecutionError, ExecutionResult};
use crate::runner::{
    apply_env, expand_env, install_link, install_template, lookup, macro_deps, run_command,
    skip_reason, Context, LinkStatement, Macro, Mode,
};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Runtime task representation
///
/// This differs from config::Task by holding parsed link and template
/// statements.
#[derive(Debug, Clone, Default)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Tasks to run first
    pub deps: Vec<String>,

    /// Environment statements
    pub envs: Vec<Statement>,

    /// Commands before the main commands
    pub cmds_pre: Vec<Statement>,

    /// Main commands
    pub cmds: Vec<Statement>,

    /// Commands after links and templates
    pub cmds_post: Vec<Statement>,

    pub links: Vec<LinkStatement>,

    pub templates: Vec<LinkStatement>,

    /// Predicates that must all succeed
    pub accepts: Vec<Statement>,

    /// Predicates that must all fail
    pub rejects: Vec<Statement>,

    /// Secrets revealed before the body runs
    pub secrets: Vec<String>,
}

impl Task {
    /// Create a new task from a configuration entry that passed `validate_task`
    pub fn from_config(name: String, config: config::Task) -> ConfigResult<Self> {
        let links = parse_links(&name, "links", &config.links)?;
        let templates = parse_links(&name, "templates", &config.templates)?;

        Ok(Task {
            name,
            deps: config.deps,
            envs: config.envs,
            cmds_pre: config.cmds_pre,
            cmds: config.cmds,
            cmds_post: config.cmds_post,
            links,
            templates,
            accepts: config.accepts,
            rejects: config.rejects,
            secrets: config.secrets,
        })
    }

    /// Task names to run before this task's body: declared dependencies,
    /// then the dependencies of macros used by its commands
    pub fn dependencies(&self, catalog: &Catalog, ctx: &Context) -> Vec<String> {
        let mut deps = self.deps.clone();

        if ctx.flags.commands_enabled() {
            for cmd in self.cmds_pre.iter().chain(&self.cmds).chain(&self.cmds_post) {
                deps.extend(macro_deps(cmd, &catalog.macros, &ctx.variant));
            }
        }

        deps
    }

    /// Run the task body, assuming it has already been marked handled
    fn execute(&self, catalog: &Catalog, ctx: &mut Context) -> ExecutionResult<()> {
        for dep in self.dependencies(catalog, ctx) {
            run_task(&expand_env(&dep), catalog, ctx)?;
        }

        for secret in &self.secrets {
            ctx.reveal_secret(&expand_env(secret))?;
        }

        for env in &self.envs {
            apply_env(env, catalog, ctx)?;
        }

        if ctx.flags.commands_enabled() {
            for cmd in self.cmds_pre.iter().chain(&self.cmds) {
                run_command(cmd, catalog, ctx, Mode::Interactive)?;
            }
        }

        if ctx.flags.links_enabled() {
            for link in &self.links {
                install_link(link, ctx)?;
            }
        }

        if ctx.flags.templates_enabled() {
            for template in &self.templates {
                install_template(template, ctx)?;
            }
        }

        if ctx.flags.commands_enabled() {
            for cmd in &self.cmds_post {
                run_command(cmd, catalog, ctx, Mode::Interactive)?;
            }
        }

        Ok(())
    }
}

/// Immutable task and macro tables for a run
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tasks: HashMap<String, Task>,
    pub macros: HashMap<String, Macro>,
}

impl Catalog {
    /// Build the tables from a validated configuration
    pub fn from_config(config: config::Config) -> ConfigResult<Self> {
        validate_config(&config)?;

        let tasks = config
            .tasks
            .into_iter()
            .map(|(name, task)| Ok((name.clone(), Task::from_config(name, task)?)))
            .collect::<ConfigResult<HashMap<_, _>>>()?;

        let macros = config
            .macros
            .into_iter()
            .map(|(name, mac)| (name, Macro::from_config(mac)))
            .collect();

        Ok(Catalog { tasks, macros })
    }
}

/// Why a task body did not run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The task already ran (or was skipped) earlier in this run
    AlreadyHandled,
    /// The task is an ancestor of itself in the dependency chain
    InProgress,
    /// This reject predicate succeeded
    Rejected(String),
    /// This accept predicate failed
    NotAccepted(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyHandled => write!(f, "already handled"),
            SkipReason::InProgress => write!(f, "dependency cycle"),
            SkipReason::Rejected(cmd) => write!(f, "rejected by '{}'", cmd),
            SkipReason::NotAccepted(cmd) => write!(f, "not accepted by '{}'", cmd),
        }
    }
}

/// Result of requesting a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    Skipped(SkipReason),
}

/// Run the task `name` and, first, everything it depends on.
///
/// Each resolved task runs at most once per context. A task is marked
/// handled before its dependencies run, so a dependency cycle cannot
/// recurse forever: the revisited task is skipped with a warning.
pub fn run_task(name: &str, catalog: &Catalog, ctx: &mut Context) -> ExecutionResult<Outcome> {
    let (key, task) = lookup(&catalog.tasks, name, &ctx.variant)
        .ok_or_else(|| ExecutionError::TaskNotFound(name.to_string()))?;

    if ctx.is_task_in_stack(&key) {
        warn!(
            "dependency cycle: task '{}' requested by '{}' is already running, skipping it",
            key,
            ctx.current_task().unwrap_or_default()
        );
        return Ok(Outcome::Skipped(SkipReason::InProgress));
    }

    if ctx.is_handled(&key) {
        debug!("skipping task: {} (already handled)", key);
        return Ok(Outcome::Skipped(SkipReason::AlreadyHandled));
    }

    if let Some(reason) = skip_reason(task, catalog, ctx) {
        info!("skipping task: {} ({})", key, reason);
        ctx.mark_handled(&key);
        return Ok(Outcome::Skipped(reason));
    }

    info!("processing task: {}", key);
    ctx.mark_handled(&key);
    ctx.push_task(key.clone());

    let result = task.execute(catalog, ctx);

    ctx.pop_task();
    result?;

    debug!("task completed: {}", key);
    Ok(Outcome::Executed)
}
