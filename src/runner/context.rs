//! Execution context for task running
//!
//! The context tracks all the state needed during a run: the source and
//! destination roots, the active variant, the policy flags, which tasks
//! have been handled, and the collaborators used for prompts and secrets.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Operator, SecretProvider, TerminalOperator};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variables exported before a run starts
pub const ENV_CONFIG: &str = "HS_CONFIG";
pub const ENV_SRC: &str = "HS_SRC";
pub const ENV_DEST: &str = "HS_DEST";
pub const ENV_VARIANT: &str = "HS_VARIANT";
pub const ENV_TASK: &str = "HS_TASK";

/// Policy switches for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// Replace existing files and directories without asking
    pub clobber: bool,
    /// Create missing parent directories without asking
    pub force: bool,
    /// Skip pre, main and post commands
    pub no_cmds: bool,
    /// Skip links
    pub no_links: bool,
    /// Skip templates
    pub no_templates: bool,
    /// Remove installed links instead of creating them
    pub unlink: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            clobber: false,
            force: true,
            no_cmds: false,
            no_links: false,
            no_templates: false,
            unlink: false,
        }
    }
}

impl Flags {
    /// Commands never run while unlinking
    pub fn commands_enabled(&self) -> bool {
        !self.no_cmds && !self.unlink
    }

    pub fn links_enabled(&self) -> bool {
        !self.no_links
    }

    /// Templates are neither rendered nor removed while unlinking
    pub fn templates_enabled(&self) -> bool {
        !self.no_templates && !self.unlink
    }
}

/// Execution context that tracks state during a run
pub struct Context {
    /// Root for relative link and template sources
    pub src_dir: PathBuf,

    /// Root for relative destinations; also the working directory of commands
    pub dst_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Active variant (empty for none)
    pub variant: String,

    /// Policy switches
    pub flags: Flags,

    /// Tasks whose body has started or that were skipped by a predicate
    handled: HashSet<String>,

    /// Tasks currently executing, outermost first
    task_stack: Vec<String>,

    operator: Box<dyn Operator>,

    secrets: Option<Box<dyn SecretProvider>>,
}

impl Context {
    /// Create a new context prompting on the terminal
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Context {
            src_dir: cwd.clone(),
            dst_dir: cwd,
            config_path: None,
            variant: String::new(),
            flags: Flags::default(),
            handled: HashSet::new(),
            task_stack: Vec::new(),
            operator: Box::new(TerminalOperator::new()),
            secrets: None,
        }
    }

    /// Set the source root
    pub fn with_src_dir(mut self, dir: PathBuf) -> Self {
        self.src_dir = dir;
        self
    }

    /// Set the destination root
    pub fn with_dst_dir(mut self, dir: PathBuf) -> Self {
        self.dst_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set the active variant
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Set the policy flags
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the operator answering prompts
    pub fn with_operator(mut self, operator: Box<dyn Operator>) -> Self {
        self.operator = operator;
        self
    }

    /// Install a provider for task secrets
    pub fn with_secret_provider(mut self, provider: Box<dyn SecretProvider>) -> Self {
        self.secrets = Some(provider);
        self
    }

    /// The operator answering prompts
    pub fn operator(&mut self) -> &mut dyn Operator {
        self.operator.as_mut()
    }

    /// Whether a task key has already been handled in this run
    pub fn is_handled(&self, key: &str) -> bool {
        self.handled.contains(key)
    }

    /// Record a task key as handled
    pub fn mark_handled(&mut self, key: &str) {
        self.handled.insert(key.to_string());
    }

    /// Push a task onto the execution stack
    pub fn push_task(&mut self, key: String) {
        self.task_stack.push(key);
    }

    /// Pop a task from the execution stack
    pub fn pop_task(&mut self) -> Option<String> {
        self.task_stack.pop()
    }

    /// Check if a task is in the execution stack (a dependency cycle)
    pub fn is_task_in_stack(&self, key: &str) -> bool {
        self.task_stack.iter().any(|t| t == key)
    }

    /// Get the current task (top of stack)
    pub fn current_task(&self) -> Option<&str> {
        self.task_stack.last().map(String::as_str)
    }

    /// Reveal a secret through the installed provider
    pub fn reveal_secret(&mut self, name: &str) -> ExecutionResult<()> {
        match self.secrets.as_mut() {
            Some(provider) => provider.reveal(name, &self.src_dir),
            None => Err(ExecutionError::Secret {
                name: name.to_string(),
                message: "no secret provider configured".to_string(),
            }),
        }
    }

    /// Resolve `path` against the source root unless it is absolute
    pub fn src_path(&self, path: &str) -> PathBuf {
        join_root(&self.src_dir, path)
    }

    /// Resolve `path` against the destination root unless it is absolute
    pub fn dst_path(&self, path: &str) -> PathBuf {
        join_root(&self.dst_dir, path)
    }

    /// Export the variables identifying this run to the process environment
    pub fn export_run_env(&self, task: &str) {
        let config = self
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        env::set_var(ENV_CONFIG, config);
        env::set_var(ENV_SRC, &self.src_dir);
        env::set_var(ENV_DEST, &self.dst_dir);
        env::set_var(ENV_VARIANT, &self.variant);
        env::set_var(ENV_TASK, task);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

fn join_root(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
