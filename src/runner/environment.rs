//! Environment statements
//!
//! `[NAME]` unsets a variable. `[NAME, value, ...]` sets it to the values
//! joined with commas. `[NAME, "!program", args...]` sets it to the
//! trimmed output of the command.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{expand_list, run_command, Catalog, Context, Mode};
use std::env;
use tracing::debug;

/// Marker that turns the value of an environment statement into a command
pub const COMMAND_MARKER: char = '!';

/// Apply one environment statement to the process environment
pub fn apply_env(statement: &[String], catalog: &Catalog, ctx: &mut Context) -> ExecutionResult<()> {
    let mut args = expand_list(statement);

    let value = match args.len() {
        0 => return Err(ExecutionError::InvalidStatement("environment")),
        1 => {
            debug!("unsetting variable: {}", args[0]);
            env::remove_var(&args[0]);
            return Ok(());
        }
        _ if args[1].starts_with(COMMAND_MARKER) => {
            args[1] = args[1].trim_start_matches(COMMAND_MARKER).to_string();
            run_command(&args[1..], catalog, ctx, Mode::Captured)?
        }
        _ => args[1..].join(","),
    };

    debug!("setting variable {} to {}", args[0], value);
    env::set_var(&args[0], value);
    Ok(())
}
