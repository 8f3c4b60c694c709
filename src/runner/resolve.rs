//! Variant-aware name resolution
//!
//! A task or macro called `name` may be overridden for a variant by
//! defining `name__variant`. The variant comes from the run (`--variant`)
//! or is spelled explicitly in the requested name.

use std::collections::HashMap;

/// Separator between a base name and its variant
pub const VARIANT_SEPARATOR: &str = "__";

/// Build the ordered list of lookup keys for `name` under `variant`
pub fn variant_names(name: &str, variant: &str) -> Vec<String> {
    let (base, variant) = match name.rsplit_once(VARIANT_SEPARATOR) {
        Some((base, explicit)) => (base, explicit),
        None => (name, variant),
    };

    if variant.is_empty() || base.ends_with(VARIANT_SEPARATOR) {
        return vec![base.to_string()];
    }

    vec![
        format!("{}{}{}", base, VARIANT_SEPARATOR, variant),
        base.to_string(),
    ]
}

/// Find the first candidate key for `name` present in `table`
pub fn lookup<'a, T>(table: &'a HashMap<String, T>, name: &str, variant: &str) -> Option<(String, &'a T)> {
    variant_names(name, variant)
        .into_iter()
        .find_map(|key| table.get(&key).map(|value| (key, value)))
}
