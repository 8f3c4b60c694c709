//! Filesystem installation of links and templates
//!
//! Destinations are prepared the same way for both: missing parent
//! directories are created (with `force` or the operator's consent) and
//! whatever already sits at the destination is removed. Symlinks are
//! always replaced; anything else needs `clobber` or the operator's consent.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{expand_env, guard, render_template, Context};
use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::{symlink, DirBuilderExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Mode used for created parent directories when a statement gives none
pub const DEFAULT_MODE: u32 = 0o755;

/// A parsed link or template statement: `[dst]`, `[dst, src]` or `[dst, src, mode]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatement {
    /// Destination, relative to the destination root unless absolute
    pub dst: String,
    /// Source, relative to the source root unless absolute
    pub src: String,
    /// Mode for parent directories created on the way to `dst`
    pub mode: u32,
}

impl LinkStatement {
    /// Parse a positional statement
    pub fn parse(statement: &[String]) -> ExecutionResult<Self> {
        match statement {
            [dst] => Ok(LinkStatement {
                dst: dst.clone(),
                src: dst.clone(),
                mode: DEFAULT_MODE,
            }),
            [dst, src] => Ok(LinkStatement {
                dst: dst.clone(),
                src: src.clone(),
                mode: DEFAULT_MODE,
            }),
            [dst, src, mode] => Ok(LinkStatement {
                dst: dst.clone(),
                src: src.clone(),
                mode: parse_mode(mode)?,
            }),
            _ => Err(ExecutionError::InvalidStatement("link")),
        }
    }

    /// Expand both paths and resolve them against the context roots
    pub fn resolve(&self, ctx: &Context) -> (PathBuf, PathBuf) {
        let src = ctx.src_path(&expand_env(&self.src));
        let dst = ctx.dst_path(&expand_env(&self.dst));
        (src, dst)
    }
}

/// Parse a file mode, honouring `0x`, `0o`, `0b` and leading-zero octal prefixes
pub fn parse_mode(text: &str) -> ExecutionResult<u32> {
    let invalid = || ExecutionError::InvalidMode(text.to_string());
    let lower = text.to_ascii_lowercase();

    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };

    if digits.is_empty() {
        return Err(invalid());
    }
    u32::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Create the missing parent directories of `path`.
///
/// Without `force` the operator is asked first; declining is not an error.
pub fn ensure_parent(path: &Path, mode: u32, ctx: &mut Context) -> ExecutionResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => return Ok(()),
    };

    if parent.exists() {
        return Ok(());
    }

    let subject = parent.display().to_string();
    if !ctx.flags.force && !ctx.operator().confirm("force create path", &subject)? {
        return Ok(());
    }

    debug!("force creating path: {}", subject);
    guard(ctx.operator(), || {
        DirBuilder::new()
            .recursive(true)
            .mode(mode)
            .create(&parent)
            .map_err(|e| ExecutionError::filesystem("create directory", &parent, e))
    })
}

/// Remove whatever exists at `path`.
///
/// Returns `false` when the operator refused to clobber a file or
/// directory; the caller should then leave the destination alone.
pub fn clear(path: &Path, ctx: &mut Context) -> ExecutionResult<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            // Unreadable entries count as absent; creating the destination reports the failure
            if e.kind() != io::ErrorKind::NotFound {
                debug!("cannot inspect {}: {}", path.display(), e);
            }
            return Ok(true);
        }
    };

    if metadata.file_type().is_symlink() {
        debug!("removing symlink: {}", path.display());
        guard(ctx.operator(), || {
            fs::remove_file(path).map_err(|e| ExecutionError::filesystem("remove symlink", path, e))
        })?;
        return Ok(true);
    }

    let subject = path.display().to_string();
    if !ctx.flags.clobber && !ctx.operator().confirm("clobber path", &subject)? {
        return Ok(false);
    }

    debug!("clobbering path: {}", subject);
    guard(ctx.operator(), || remove_all(path))?;
    Ok(true)
}

/// Install (or, in unlink mode, remove) a symlink
pub fn install_link(link: &LinkStatement, ctx: &mut Context) -> ExecutionResult<()> {
    let (src, dst) = link.resolve(ctx);

    if ctx.flags.unlink {
        if !is_symlink(&dst) {
            return Ok(());
        }
        info!("unlinking {}", dst.display());
        return clear(&dst, ctx).map(|_| ());
    }

    if !src.exists() {
        return Err(ExecutionError::SourceMissing(src));
    }

    ensure_parent(&dst, link.mode, ctx)?;
    if !clear(&dst, ctx)? {
        info!("leaving {} in place", dst.display());
        return Ok(());
    }

    info!("linking {} to {}", src.display(), dst.display());
    guard(ctx.operator(), || {
        symlink(&src, &dst).map_err(|e| ExecutionError::filesystem("create symlink", &dst, e))
    })
}

/// Render a template to its destination
pub fn install_template(template: &LinkStatement, ctx: &mut Context) -> ExecutionResult<()> {
    let (src, dst) = template.resolve(ctx);

    if !src.exists() {
        return Err(ExecutionError::SourceMissing(src));
    }

    ensure_parent(&dst, template.mode, ctx)?;
    if !clear(&dst, ctx)? {
        info!("leaving {} in place", dst.display());
        return Ok(());
    }

    info!("rendering template {} to {}", src.display(), dst.display());
    guard(ctx.operator(), || render_template(&src, &dst))
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

fn remove_all(path: &Path) -> ExecutionResult<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| ExecutionError::filesystem("remove", path, e))
}
