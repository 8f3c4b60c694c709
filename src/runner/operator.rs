//! Operator interaction
//!
//! The engine never reads the terminal directly. Questions about
//! destructive or failed operations go through an [`Operator`], so the
//! decisions can be scripted in tests and automation.

use crate::error::{ExecutionError, ExecutionResult};
use colored::Colorize;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// What to do after an operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Propagate the error and stop the run
    Abort,
    /// Run the operation again
    Retry,
    /// Forget the error and carry on as if the operation was not requested
    Cancel,
}

/// Decision maker for interactive questions
pub trait Operator {
    /// Ask a yes/no question about `subject`
    fn confirm(&mut self, question: &str, subject: &str) -> ExecutionResult<bool>;

    /// Decide how to recover from a failed operation
    fn recover(&mut self, error: &ExecutionError) -> ExecutionResult<Recovery>;
}

/// Operator answering on a terminal, one line per answer
pub struct TerminalOperator<R, W> {
    input: R,
    output: W,
}

impl TerminalOperator<BufReader<Stdin>, Stdout> {
    /// Operator reading stdin and prompting on stdout
    pub fn new() -> Self {
        TerminalOperator::with_io(BufReader::new(io::stdin()), io::stdout())
    }
}

impl Default for TerminalOperator<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    /// Operator over arbitrary input and output streams
    pub fn with_io(input: R, output: W) -> Self {
        TerminalOperator { input, output }
    }

    /// Print `prompt` and read one answer, lowercased and trimmed.
    /// `None` means the input is exhausted.
    fn ask(&mut self, prompt: &str) -> ExecutionResult<Option<String>> {
        write!(self.output, "{}", prompt).map_err(ExecutionError::Prompt)?;
        self.output.flush().map_err(ExecutionError::Prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(ExecutionError::Prompt)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

impl<R: BufRead, W: Write> Operator for TerminalOperator<R, W> {
    fn confirm(&mut self, question: &str, subject: &str) -> ExecutionResult<bool> {
        let prompt = format!("{} {}: [y]es, [n]o? ", question.bold(), subject);
        loop {
            match self.ask(&prompt)?.as_deref() {
                Some("y") => return Ok(true),
                Some("n") | None => return Ok(false),
                Some(_) => continue,
            }
        }
    }

    fn recover(&mut self, error: &ExecutionError) -> ExecutionResult<Recovery> {
        let prompt = format!("{}: [a]bort, [r]etry, [c]ancel? ", error.to_string().red());
        loop {
            match self.ask(&prompt)?.as_deref() {
                Some("a") | None => return Ok(Recovery::Abort),
                Some("r") => return Ok(Recovery::Retry),
                Some("c") => return Ok(Recovery::Cancel),
                Some(_) => continue,
            }
        }
    }
}
