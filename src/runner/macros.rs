//! Command macros
//!
//! A command whose first argument is `@name` is rewritten as
//! `prefix ++ arguments ++ suffix` of the macro `name`. The result may
//! itself start with a macro reference, so expansion repeats until the
//! first argument is a literal program name.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{expand_list, lookup};
use std::collections::HashMap;
use tracing::debug;

/// Marker that introduces a macro reference
pub const MACRO_MARKER: char = '@';

/// Longest chain of nested expansions accepted
pub const MAX_MACRO_DEPTH: usize = 64;

/// Runtime macro representation
#[derive(Debug, Clone, Default)]
pub struct Macro {
    /// Tasks to run before any task that uses this macro
    pub deps: Vec<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
}

impl Macro {
    pub fn from_config(config: config::Macro) -> Self {
        Macro {
            deps: config.deps,
            prefix: config.prefix,
            suffix: config.suffix,
        }
    }
}

/// Expand macro references at the head of `args`.
///
/// `args` is expected to be environment-expanded already; only the spliced
/// prefix and suffix are expanded here.
pub fn expand_macros(
    args: Vec<String>,
    macros: &HashMap<String, Macro>,
    variant: &str,
) -> ExecutionResult<Vec<String>> {
    let mut args = args;

    for depth in 0..=MAX_MACRO_DEPTH {
        let name = match args.first().and_then(|first| first.strip_prefix(MACRO_MARKER)) {
            Some(name) => name,
            None => return Ok(args),
        };
        if depth == MAX_MACRO_DEPTH {
            break;
        }

        let (key, mac) = lookup(macros, name, variant)
            .ok_or_else(|| ExecutionError::MacroNotFound(args[0].clone()))?;
        debug!("expanding macro: {}", key);

        let mut expanded = expand_list(&mac.prefix);
        expanded.extend_from_slice(&args[1..]);
        expanded.extend(expand_list(&mac.suffix));
        args = expanded;
    }

    Err(ExecutionError::MacroRecursion(
        args.first().cloned().unwrap_or_default(),
    ))
}

/// Dependencies declared by the macro a command statement refers to.
///
/// Statements that do not start with a macro reference, or refer to an
/// unknown macro, have no dependencies; the unknown macro is reported when
/// the command runs.
pub fn macro_deps(statement: &[String], macros: &HashMap<String, Macro>, variant: &str) -> Vec<String> {
    statement
        .first()
        .and_then(|first| first.strip_prefix(MACRO_MARKER))
        .and_then(|name| lookup(macros, name, variant))
        .map(|(_, mac)| mac.deps.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table(entries: &[(&str, &[&str], &[&str])]) -> HashMap<String, Macro> {
        entries
            .iter()
            .map(|(name, prefix, suffix)| {
                (
                    name.to_string(),
                    Macro {
                        deps: Vec::new(),
                        prefix: strings(prefix),
                        suffix: strings(suffix),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_literal_command_unchanged() {
        let macros = table(&[]);
        let args = strings(&["echo", "hi"]);
        assert_eq!(expand_macros(args.clone(), &macros, "").unwrap(), args);
    }

    #[test]
    fn test_prefix_splicing() {
        let macros = table(&[("greet", &["echo", "hello"], &[])]);
        let args = strings(&["@greet", "world"]);
        assert_eq!(
            expand_macros(args, &macros, "").unwrap(),
            vec!["echo", "hello", "world"]
        );
    }

    #[test]
    fn test_prefix_and_suffix() {
        let macros = table(&[("git", &["git", "-C", "repo"], &["--quiet"])]);
        let args = strings(&["@git", "pull"]);
        assert_eq!(
            expand_macros(args, &macros, "").unwrap(),
            vec!["git", "-C", "repo", "pull", "--quiet"]
        );
    }

    #[test]
    fn test_chained_macros() {
        let macros = table(&[
            ("install", &["@sudo", "apt-get", "install"], &["-y"]),
            ("sudo", &["sudo", "-E"], &[]),
        ]);
        let args = strings(&["@install", "vim"]);
        assert_eq!(
            expand_macros(args, &macros, "").unwrap(),
            vec!["sudo", "-E", "apt-get", "install", "vim", "-y"]
        );
    }

    #[test]
    fn test_variant_macro_preferred() {
        let macros = table(&[
            ("install", &["apt-get", "install"], &[]),
            ("install__mac", &["brew", "install"], &[]),
        ]);
        let args = strings(&["@install", "vim"]);
        assert_eq!(
            expand_macros(args.clone(), &macros, "mac").unwrap(),
            vec!["brew", "install", "vim"]
        );
        assert_eq!(
            expand_macros(args, &macros, "linux").unwrap(),
            vec!["apt-get", "install", "vim"]
        );
    }

    #[test]
    fn test_unknown_macro() {
        let macros = table(&[]);
        let result = expand_macros(strings(&["@missing"]), &macros, "dev");
        match result {
            Err(ExecutionError::MacroNotFound(name)) => assert_eq!(name, "@missing"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_self_referencing_macro_is_bounded() {
        let macros = table(&[("loop", &["@loop"], &[])]);
        let result = expand_macros(strings(&["@loop"]), &macros, "");
        assert!(matches!(result, Err(ExecutionError::MacroRecursion(_))));
    }

    #[test]
    fn test_chain_at_depth_limit() {
        let names: Vec<String> = (0..MAX_MACRO_DEPTH).map(|i| format!("m{}", i)).collect();
        let mut macros = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            let head = match names.get(i + 1) {
                Some(next) => format!("@{}", next),
                None => "echo".to_string(),
            };
            macros.insert(
                name.clone(),
                Macro {
                    prefix: vec![head],
                    ..Macro::default()
                },
            );
        }

        let args = strings(&["@m0", "x"]);
        assert_eq!(expand_macros(args, &macros, "").unwrap(), vec!["echo", "x"]);

        macros.get_mut("m63").unwrap().prefix = strings(&["@m64"]);
        macros.insert(
            "m64".to_string(),
            Macro {
                prefix: strings(&["echo"]),
                ..Macro::default()
            },
        );
        let result = expand_macros(strings(&["@m0"]), &macros, "");
        assert!(matches!(result, Err(ExecutionError::MacroRecursion(_))));
    }

    #[test]
    fn test_macro_deps() {
        let mut macros = table(&[("brew", &["brew", "install"], &[])]);
        macros.get_mut("brew").unwrap().deps = strings(&["homebrew"]);

        assert_eq!(macro_deps(&strings(&["@brew", "jq"]), &macros, ""), vec!["homebrew"]);
        assert!(macro_deps(&strings(&["brew", "jq"]), &macros, "").is_empty());
        assert!(macro_deps(&strings(&["@nope"]), &macros, "").is_empty());
        assert!(macro_deps(&[], &macros, "").is_empty());
    }
}
