//! Theme documents and display modes.
//!
//! A [`ThemeDocument`] is an immutable JSON tree. Sections are read through
//! lenient accessors: a field with the wrong shape reads as absent, so
//! generation stays best-effort and only [`validate`](crate::validate) complains.
//!
//! Two schemas exist:
//!
//! | Version | Marker fields |
//! |---------|---------------|
//! | `"1"` (legacy) | `colors.{light,dark}`, `fonts`, `radius` |
//! | `"2"` (canonical) | `scales`, `semanticTokens`, `statusColors`, `chartColors`, `sidebarTokens`, `effects`, `animations` |
//!
//! Detection looks at the marker fields, not at the declared `version`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::LoadError;

/// Maximum number of pointer hops followed by the resolver.
pub const MAX_REFERENCE_DEPTH: usize = 10;

/// Number of steps in a color scale (and in its alpha ramp).
pub const SCALE_STEPS: usize = 12;

/// Upper bound on scales processed per document.
pub const MAX_SCALES: usize = 64;

/// Upper bound on entries processed per token set.
pub const MAX_TOKENS_PER_SET: usize = 512;

/// Upper bound on animations processed per document.
pub const MAX_ANIMATIONS: usize = 128;

/// Fields that only exist in the canonical schema.
pub const CANONICAL_FIELDS: &[&str] = &[
    "scales",
    "semanticTokens",
    "statusColors",
    "chartColors",
    "sidebarTokens",
    "effects",
    "animations",
];

/// Display mode a variable map is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Light, Mode::Dark];

    /// The key used for this mode inside per-mode sections.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which modes a generation request produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSelection {
    Light,
    Dark,
    #[default]
    Both,
}

impl ModeSelection {
    pub fn modes(self) -> &'static [Mode] {
        match self {
            ModeSelection::Light => &[Mode::Light],
            ModeSelection::Dark => &[Mode::Dark],
            ModeSelection::Both => &Mode::ALL,
        }
    }

    pub fn includes(self, mode: Mode) -> bool {
        self.modes().contains(&mode)
    }
}

/// Theme schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "1")]
    Legacy,
    #[serde(rename = "2")]
    Canonical,
}

impl SchemaVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "1",
            SchemaVersion::Canonical => "2",
        }
    }
}

/// A theme document, held as an immutable JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDocument {
    root: Value,
}

impl ThemeDocument {
    /// Wraps a JSON value. The root must be an object.
    pub fn from_value(root: Value) -> Result<Self, LoadError> {
        if !root.is_object() {
            return Err(LoadError::NotAnObject {
                found: kind_of(&root),
            });
        }
        Ok(Self { root })
    }

    /// Parses a JSON theme document.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parses a YAML theme document.
    ///
    /// Non-string mapping keys (e.g. step numbers written as `1:`) are
    /// converted to their string form.
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(yaml_to_json(value))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn id(&self) -> Option<&str> {
        self.root.get("id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.root.get("category").and_then(Value::as_str)
    }

    /// The `version` field as written, accepting `"2"` and `2` alike.
    pub fn declared_version(&self) -> Option<String> {
        match self.root.get("version")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns a top-level section if it is an object.
    pub fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    /// Returns `section.{mode}` if both levels are objects.
    pub fn mode_section(&self, key: &str, mode: Mode) -> Option<&Map<String, Value>> {
        self.section(key)?.get(mode.as_str())?.as_object()
    }

    /// True if any canonical-only field is present.
    pub fn is_canonical(&self) -> bool {
        CANONICAL_FIELDS
            .iter()
            .any(|field| self.root.get(field).is_some())
    }

    pub fn detect_version(&self) -> SchemaVersion {
        if self.is_canonical() {
            SchemaVersion::Canonical
        } else {
            SchemaVersion::Legacy
        }
    }
}

/// Iterates `set` up to [`MAX_TOKENS_PER_SET`] entries, warning when it is
/// cut short. `label` names the set in the warning.
pub(crate) fn limited<'a>(
    set: Option<&'a Map<String, Value>>,
    label: &str,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    if let Some(set) = set {
        if set.len() > MAX_TOKENS_PER_SET {
            warn!(
                set = label,
                count = set.len(),
                limit = MAX_TOKENS_PER_SET,
                "token set too large; extra entries are ignored"
            );
        }
    }
    set.into_iter().flatten().take(MAX_TOKENS_PER_SET)
}

/// Converts a scalar JSON value into the literal text emitted for it.
pub(crate) fn literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => match serde_yaml::to_string(&other) {
                        Ok(s) => s.trim().to_string(),
                        Err(_) => continue,
                    },
                };
                out.insert(key, yaml_to_json(v));
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
