//! Command execution
//!
//! This module runs command statements as subprocesses, either attached to
//! the terminal or with their output captured.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{expand_list, expand_macros, guard, Catalog, Context};
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

/// How a command is attached to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Inherit the terminal; failures go through the retry gate
    Interactive,
    /// Capture stdout and report failures to the caller
    Captured,
}

/// Run a command statement.
///
/// Returns the captured stdout (without trailing line breaks) in
/// [`Mode::Captured`] and an empty string in [`Mode::Interactive`].
pub fn run_command(
    statement: &[String],
    catalog: &Catalog,
    ctx: &mut Context,
    mode: Mode,
) -> ExecutionResult<String> {
    let args = expand_list(statement);
    if args.is_empty() {
        return Err(ExecutionError::InvalidStatement("command"));
    }

    let args = expand_macros(args, &catalog.macros, &ctx.variant)?;
    let (program, rest) = args
        .split_first()
        .ok_or(ExecutionError::InvalidStatement("command"))?;

    match mode {
        Mode::Interactive => {
            debug!("executing command: {}", args.join(" "));
            let dir = ctx.dst_dir.clone();
            guard(ctx.operator(), || spawn_interactive(program, rest, &dir))?;
            Ok(String::new())
        }
        Mode::Captured => {
            debug!("executing command (captured): {}", args.join(" "));
            spawn_captured(program, rest, &ctx.dst_dir)
        }
    }
}

/// Whether a command statement exits successfully
pub fn check_command(statement: &[String], catalog: &Catalog, ctx: &mut Context) -> bool {
    match run_command(statement, catalog, ctx, Mode::Captured) {
        Ok(_) => true,
        Err(err) => {
            debug!("check failed: {}", err);
            false
        }
    }
}

fn spawn_interactive(program: &str, args: &[String], dir: &Path) -> ExecutionResult<()> {
    let status = StdCommand::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ExecutionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(command_failed(program, args, status.code()));
    }

    Ok(())
}

fn spawn_captured(program: &str, args: &[String], dir: &Path) -> ExecutionResult<String> {
    let output = StdCommand::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| ExecutionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(command_failed(program, args, output.status.code()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
}

fn command_failed(program: &str, args: &[String], code: Option<i32>) -> ExecutionError {
    let mut command = program.to_string();
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    ExecutionError::CommandFailed { command, code }
}
