//! Main CLI application

use crate::config::{parse_config_auto, parse_config_file, Config};
use crate::error::ExecutionError;
use crate::runner::{run_task, Catalog, Context, Flags, Outcome};
use anyhow::{anyhow, bail, Context as _};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use directories::BaseDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Task run when none is named on the command line
pub const DEFAULT_TASK: &str = "default";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "homestead",
    author,
    version,
    about = "A declarative task runner for bootstrapping machines and managing dotfiles",
    long_about = None
)]
pub struct Cli {
    /// Task to run
    #[arg(default_value = DEFAULT_TASK)]
    pub task: String,

    /// Path to the configuration file (searched for when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root for relative link and template sources
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Root for relative destinations (defaults to the home directory)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Prefer `<name>__<variant>` tasks and macros
    #[arg(long, value_name = "NAME", default_value = "")]
    pub variant: String,

    /// Replace existing files without asking
    #[arg(long)]
    pub clobber: bool,

    /// Ask before creating missing parent directories
    #[arg(long)]
    pub no_force: bool,

    /// Skip commands
    #[arg(long)]
    pub no_cmds: bool,

    /// Skip links
    #[arg(long)]
    pub no_links: bool,

    /// Skip templates
    #[arg(long)]
    pub no_templates: bool,

    /// Remove installed links instead of creating them
    #[arg(long)]
    pub unlink: bool,

    /// Load environment variables from a .env file before running
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Print verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Verbosity selected by `-q` and `-v`
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Policy flags for the run
    pub fn flags(&self) -> Flags {
        Flags {
            clobber: self.clobber,
            force: !self.no_force,
            no_cmds: self.no_cmds,
            no_links: self.no_links,
            no_templates: self.no_templates,
            unlink: self.unlink,
        }
    }
}

/// How much the run reports on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Default log level; `RUST_LOG` takes precedence
    pub fn level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::WARN,
            Verbosity::Normal => Level::INFO,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(verbosity.level().into()));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    run_with(Cli::parse())
}

/// Run the CLI application with parsed arguments
pub fn run_with(cli: Cli) -> anyhow::Result<()> {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "homestead", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbosity());

    if let Some(env_file) = &cli.env_file {
        dotenvy::from_path(env_file)
            .with_context(|| format!("failed to load environment from {}", env_file.display()))?;
    }

    let (config, config_path) = load_config(cli.config.as_deref())?;
    let catalog = Catalog::from_config(config)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

    let src_dir = canonical_dir(cli.src.clone().unwrap_or_else(|| PathBuf::from(".")))?;
    let dst_dir = match &cli.dest {
        Some(dest) => canonical_dir(dest.clone())?,
        None => canonical_dir(home_dir()?)?,
    };

    info!("configuration: {}", config_path.display());
    info!("source: {}, destination: {}", src_dir.display(), dst_dir.display());

    let mut ctx = Context::new()
        .with_src_dir(src_dir)
        .with_dst_dir(dst_dir)
        .with_config_path(config_path)
        .with_variant(cli.variant.clone())
        .with_flags(cli.flags());
    ctx.export_run_env(&cli.task);

    match run_task(&cli.task, &catalog, &mut ctx) {
        Ok(Outcome::Executed) => Ok(()),
        Ok(Outcome::Skipped(reason)) => {
            info!("task {} skipped ({})", cli.task, reason);
            Ok(())
        }
        Err(ExecutionError::TaskNotFound(name)) => Err(anyhow!(
            "task or variant not found: {} (available: {})",
            name,
            known_tasks(&catalog)
        )),
        Err(err) => Err(anyhow::Error::new(err).context(format!("task {} failed", cli.task))),
    }
}

/// Load the configuration named on the command line, or discover one
fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, PathBuf)> {
    match path {
        Some(path) => {
            let path = fs::canonicalize(path)
                .with_context(|| format!("configuration file {} not found", path.display()))?;
            let config = parse_config_file(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            Ok((config, path))
        }
        None => Ok(parse_config_auto()?),
    }
}

fn canonical_dir(path: PathBuf) -> anyhow::Result<PathBuf> {
    let dir = fs::canonicalize(&path)
        .with_context(|| format!("directory {} does not exist", path.display()))?;
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    Ok(dir)
}

fn home_dir() -> anyhow::Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| anyhow!("could not determine the home directory; pass --dest"))
}

fn known_tasks(catalog: &Catalog) -> String {
    let mut names: Vec<&str> = catalog.tasks.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_task() {
        let cli = Cli::try_parse_from(["homestead"]).unwrap();
        assert_eq!(cli.task, DEFAULT_TASK);
        assert_eq!(cli.variant, "");
        assert_eq!(cli.verbosity(), Verbosity::Normal);
        assert_eq!(cli.flags(), Flags::default());
    }

    #[test]
    fn test_flags_from_arguments() {
        let cli = Cli::try_parse_from([
            "homestead",
            "--clobber",
            "--no-force",
            "--no-templates",
            "--variant",
            "work",
            "vim",
        ])
        .unwrap();

        assert_eq!(cli.task, "vim");
        assert_eq!(cli.variant, "work");

        let flags = cli.flags();
        assert!(flags.clobber);
        assert!(!flags.force);
        assert!(flags.no_templates);
        assert!(!flags.no_cmds);
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["homestead", "-q"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
        assert_eq!(cli.verbosity().level(), Level::WARN);

        let cli = Cli::try_parse_from(["homestead", "-v"]).unwrap();
        assert_eq!(cli.verbosity().level(), Level::DEBUG);

        assert!(Cli::try_parse_from(["homestead", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_config_file_arguments() {
        let cli = Cli::try_parse_from(["homestead", "-c", "dots/homestead.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dots/homestead.toml")));
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::try_parse_from(["homestead", "--completions", "zsh"]).unwrap();
        assert_eq!(cli.completions, Some(Shell::Zsh));
    }

    #[test]
    fn test_known_tasks_sorted() {
        let mut catalog = Catalog::default();
        for name in ["vim", "default", "git"] {
            catalog.tasks.insert(name.to_string(), Default::default());
        }
        assert_eq!(known_tasks(&catalog), "default, git, vim");
    }
}
