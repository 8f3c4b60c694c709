//! Secrets revealed before a task body runs
//!
//! Homestead does not decrypt anything itself. A task lists the encrypted
//! files it needs and the installed [`SecretProvider`] makes them available
//! (typically by writing the decrypted file next to its encrypted copy in
//! the source tree) before links and templates referencing them are
//! installed.

use crate::error::ExecutionResult;
use std::path::Path;

/// Collaborator that reveals encrypted files
pub trait SecretProvider {
    /// Reveal the secret `name`, relative to the source root `src_dir`
    fn reveal(&mut self, name: &str, src_dir: &Path) -> ExecutionResult<()>;
}
