//! Environment variable expansion
//!
//! Replaces `$NAME` and `${NAME}` with values from the process environment.
//! Unset variables expand to the empty string. A `$` that does not start a
//! reference is kept as is.

use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z0-9_]+))").expect("reference pattern is valid")
});

/// Expand environment references in a single string
pub fn expand_env(s: &str) -> String {
    REFERENCE
        .replace_all(s, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            if name.is_empty() {
                return String::new();
            }
            env::var(name).unwrap_or_default()
        })
        .into_owned()
}

/// Expand environment references in every string of a list
pub fn expand_list<S: AsRef<str>>(list: &[S]) -> Vec<String> {
    list.iter().map(|s| expand_env(s.as_ref())).collect()
}
