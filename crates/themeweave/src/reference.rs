//! Reference pointer resolution.
//!
//! A pointer is an object with a single `$ref` field holding a dot-delimited
//! path into the same document:
//!
//! ```json
//! { "primary": { "$ref": "scales.teal.steps.light.9" } }
//! ```
//!
//! Resolution walks the path from the document root. If the target is itself
//! a pointer, resolution recurses, so multi-hop chains work up to
//! [`MAX_REFERENCE_DEPTH`] hops. Every hop is checked, in order, for:
//!
//! 1. depth: the chain may not reach [`MAX_REFERENCE_DEPTH`]
//! 2. cycles: a path already on the chain is rejected
//! 3. reserved segments: see [`RESERVED_SEGMENTS`]
//! 4. existence: each segment must exist below the previous one
//!
//! The visited chain is an explicit [`Visited`] value. Each recursive step
//! builds an extended copy, so no state is shared between calls.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use themeweave::reference::{resolve, Visited};
//!
//! let doc = json!({
//!     "scales": { "teal": { "steps": { "light": { "9": "#12a594" } } } },
//!     "alias": { "$ref": "scales.teal.steps.light.9" }
//! });
//! let pointer = json!({ "$ref": "alias" });
//! let resolved = resolve(&pointer, &doc, &Visited::new(), 0).unwrap();
//! assert_eq!(resolved, "#12a594");
//! ```

use serde_json::Value;

use crate::document::{literal, MAX_REFERENCE_DEPTH};
use crate::error::ReferenceError;

/// Field name marking a reference pointer.
pub const REF_KEY: &str = "$ref";

/// Path segments that are never followed.
pub const RESERVED_SEGMENTS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Paths already followed on the current resolution chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visited {
    chain: Vec<String>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.chain.iter().any(|p| p == path)
    }

    /// Returns a copy of this chain extended with `path`.
    pub fn with(&self, path: &str) -> Self {
        let mut chain = self.chain.clone();
        chain.push(path.to_string());
        Self { chain }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Returns the path of a reference pointer, or `None` for any other value.
pub fn as_reference(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY)?.as_str()
}

/// True if `value` is a reference pointer.
pub fn is_reference(value: &Value) -> bool {
    as_reference(value).is_some()
}

/// Builds a pointer value for `path`.
pub fn reference(path: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(REF_KEY.to_string(), Value::String(path.to_string()));
    Value::Object(map)
}

/// Resolves `value` against `root`.
///
/// Non-pointer values are returned as-is, which makes resolution idempotent
/// on already resolved input.
pub fn resolve<'a>(
    value: &'a Value,
    root: &'a Value,
    visited: &Visited,
    depth: usize,
) -> Result<&'a Value, ReferenceError> {
    let Some(path) = as_reference(value) else {
        return Ok(value);
    };

    if depth >= MAX_REFERENCE_DEPTH {
        return Err(ReferenceError::DepthExceeded {
            path: path.to_string(),
            limit: MAX_REFERENCE_DEPTH,
        });
    }

    if visited.contains(path) {
        let mut chain = visited.chain.clone();
        chain.push(path.to_string());
        return Err(ReferenceError::Circular {
            path: path.to_string(),
            chain,
        });
    }

    let target = lookup(root, path)?;
    resolve(target, root, &visited.with(path), depth + 1)
}

/// Walks `path` from `root` without following pointers on the way.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Result<&'a Value, ReferenceError> {
    check_path(path)?;

    let mut current = root;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| ReferenceError::NotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        })?;
    }
    Ok(current)
}

/// Resolves `value` and converts the result to literal text.
///
/// `Ok(None)` means the target exists but is not a scalar.
pub fn resolve_literal(value: &Value, root: &Value) -> Result<Option<String>, ReferenceError> {
    let resolved = resolve(value, root, &Visited::new(), 0)?;
    Ok(literal(resolved))
}

/// The text kept for a value whose resolution failed: the pointer path for
/// pointers, the literal itself otherwise.
pub fn unresolved_literal(value: &Value) -> Option<String> {
    match as_reference(value) {
        Some(path) => Some(path.to_string()),
        None => literal(value),
    }
}

fn check_path(path: &str) -> Result<(), ReferenceError> {
    for segment in path.split('.') {
        if segment.is_empty() || RESERVED_SEGMENTS.contains(&segment) {
            return Err(ReferenceError::UnsafePath {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
    }
    Ok(())
}
