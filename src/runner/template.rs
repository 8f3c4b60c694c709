//! Template rendering
//!
//! Templates are rendered with minijinja. The process environment is
//! available as `env`, so `{{ env.HOME }}` renders the home directory.

use crate::error::{ExecutionError, ExecutionResult};
use minijinja::{context, Environment};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// Render the template at `src` into `dst`
pub fn render_template(src: &Path, dst: &Path) -> ExecutionResult<()> {
    let source = fs::read_to_string(src)
        .map_err(|e| ExecutionError::filesystem("read template", src, e))?;

    let rendered = render_str(&source).map_err(|e| ExecutionError::Template {
        path: src.to_path_buf(),
        message: e.to_string(),
    })?;

    fs::write(dst, rendered).map_err(|e| ExecutionError::filesystem("write", dst, e))
}

/// Render template text against the current environment
pub fn render_str(source: &str) -> Result<String, minijinja::Error> {
    let mut templates = Environment::new();
    templates.set_keep_trailing_newline(true);

    let vars: BTreeMap<String, String> = env::vars().collect();
    templates.render_str(source, context! { env => vars })
}
