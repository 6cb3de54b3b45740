//! Page metadata and the merge rules that assemble it.
//!
//! A page's [`Meta`] is built from three layers, highest priority first:
//!
//! ```text
//! content/a/b/meta.toml        ← explicit page metadata (overwrites)
//! content/a/b/defaults.toml    ← own directory defaults
//! content/a/defaults.toml      ← nearer ancestor defaults
//! content/defaults.toml        ← farther ancestor defaults
//! ```
//!
//! Every layer is applied with [`merge`]; the `overwrite` flag decides whether
//! an existing key is replaced or kept. Keys are never removed.
//!
//! Values use the JSON value model so that TOML, JSON and YAML sources all
//! land in the same shape. The map is key-ordered, which keeps rendered output
//! byte-stable between builds.

use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed metadata attached to a page.
pub type Meta = BTreeMap<String, Value>;

/// Merge `from` into `into`.
///
/// Absent keys are always inserted. Keys already present in `into` are
/// replaced only when `overwrite` is set.
pub fn merge(into: &mut Meta, from: &Meta, overwrite: bool) {
    for (key, value) in from {
        if overwrite || !into.contains_key(key) {
            into.insert(key.clone(), value.clone());
        }
    }
}

/// Like [`merge`], but consumes `from` to avoid cloning values.
pub fn merge_owned(into: &mut Meta, from: Meta, overwrite: bool) {
    for (key, value) in from {
        if overwrite || !into.contains_key(&key) {
            into.insert(key, value);
        }
    }
}

/// Read a string value. Missing keys and non-string values yield `None`.
pub fn get_str<'a>(meta: &'a Meta, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(Value::as_str)
}
