//! Common test utilities

#![allow(dead_code)]

use homestead::config::{parse_config, Format};
use homestead::error::{ExecutionError, ExecutionResult};
use homestead::runner::{Catalog, Context, Flags, Operator, Recovery, SecretProvider};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Scratch source and destination trees for one test
pub struct Sandbox {
    pub temp_dir: TempDir,
    pub src: PathBuf,
    pub dst: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("home");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        Sandbox { temp_dir, src, dst }
    }

    /// Write a file under the source root
    pub fn source(&self, name: &str, content: &str) -> PathBuf {
        write_file(&self.src.join(name), content)
    }

    /// Write a file under the destination root
    pub fn existing(&self, name: &str, content: &str) -> PathBuf {
        write_file(&self.dst.join(name), content)
    }

    /// Context rooted in the sandbox that answers every question with `operator`
    pub fn context(&self, operator: Scripted) -> Context {
        Context::new()
            .with_src_dir(self.src.clone())
            .with_dst_dir(self.dst.clone())
            .with_operator(Box::new(operator))
    }

    pub fn context_with_flags(&self, operator: Scripted, flags: Flags) -> Context {
        self.context(operator).with_flags(flags)
    }

    /// Path of a scratch file outside both roots
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Operator with fixed answers that records the questions it was asked
#[derive(Clone)]
pub struct Scripted {
    pub confirm: bool,
    pub recovery: Recovery,
    pub asked: Rc<RefCell<Vec<String>>>,
}

impl Scripted {
    pub fn new(confirm: bool, recovery: Recovery) -> Self {
        Scripted {
            confirm,
            recovery,
            asked: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Declines every question and aborts on failure
    pub fn strict() -> Self {
        Self::new(false, Recovery::Abort)
    }

    /// Accepts every question and aborts on failure
    pub fn agreeable() -> Self {
        Self::new(true, Recovery::Abort)
    }
}

impl Operator for Scripted {
    fn confirm(&mut self, question: &str, subject: &str) -> ExecutionResult<bool> {
        self.asked.borrow_mut().push(format!("{} {}", question, subject));
        Ok(self.confirm)
    }

    fn recover(&mut self, error: &ExecutionError) -> ExecutionResult<Recovery> {
        self.asked.borrow_mut().push(error.to_string());
        Ok(self.recovery)
    }
}

/// Secret provider that records the names it was asked to reveal
#[derive(Clone, Default)]
pub struct RecordingSecrets {
    pub revealed: Rc<RefCell<Vec<String>>>,
}

impl SecretProvider for RecordingSecrets {
    fn reveal(&mut self, name: &str, _src_dir: &Path) -> ExecutionResult<()> {
        self.revealed.borrow_mut().push(name.to_string());
        Ok(())
    }
}

/// Build a catalog from YAML text
pub fn catalog(yaml: &str) -> Catalog {
    Catalog::from_config(parse_config(yaml, Format::Yaml).unwrap()).unwrap()
}

/// Lines appended to a log file by the commands under test
pub fn log_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// Create a temporary directory holding a configuration file
pub fn create_test_config(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(file_name);
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}
