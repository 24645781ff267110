//! Legacy (v1) to canonical (v2) schema migration.
//!
//! Legacy themes carry raw per-mode colors:
//!
//! ```yaml
//! colors:
//!   light: { background: "#fff", primaryForeground: "#fff", chart1: "#f00" }
//!   dark:  { ... }
//! fonts: { sans: "Inter" }
//! radius: 0.5rem
//! ```
//!
//! Migration keeps every legacy field and adds the canonical structure:
//!
//! - each color is mapped to its canonical location: `chart-*` keys go to
//!   `chartColors.{mode}`, `sidebar-*` keys to `sidebarTokens.{mode}`, all
//!   others to `semanticTokens.{mode}` (names normalized to kebab-case,
//!   see [`LEGACY_ALIASES`] for renames)
//! - canonical-only tokens are synthesized from [`FALLBACK_CHAINS`] as
//!   pointers to the first token of the chain that exists
//! - baseline status colors are filled in from fixed defaults
//! - `fonts` and `radius` move to `typography.fonts` and `spacing.radius`
//!
//! Migrating a canonical document returns it unchanged.

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{Mode, ThemeDocument};
use crate::effects::to_kebab_case;
use crate::reference::reference;

/// Legacy token names that changed in the canonical schema.
pub const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("danger", "destructive"),
    ("danger-foreground", "destructive-foreground"),
    ("text", "foreground"),
];

/// Canonical-only tokens and the tokens they fall back to, in order.
pub const FALLBACK_CHAINS: &[(&str, &[&str])] = &[
    ("surface", &["muted", "background"]),
    ("surface-foreground", &["muted-foreground", "foreground"]),
    ("surface-raised", &["card", "muted", "background"]),
    ("surface-sunken", &["muted", "background"]),
    ("panel", &["card", "popover", "background"]),
    ("panel-foreground", &["card-foreground", "foreground"]),
    ("overlay", &["popover", "card", "background"]),
    ("overlay-foreground", &["popover-foreground", "foreground"]),
    ("primary-hover", &["primary"]),
    ("secondary-hover", &["secondary", "muted"]),
    ("accent-hover", &["accent", "muted"]),
    ("destructive-hover", &["destructive"]),
    ("ring-offset", &["background"]),
];

/// Default status colors per mode: `(name, light, dark)`.
pub const DEFAULT_STATUS_COLORS: &[(&str, &str, &str)] = &[
    ("success", "#16a34a", "#22c55e"),
    ("warning", "#d97706", "#f59e0b"),
    ("info", "#2563eb", "#3b82f6"),
];

/// Upgrades a legacy document to the canonical schema.
pub fn migrate(doc: &ThemeDocument) -> ThemeDocument {
    if doc.is_canonical() {
        return doc.clone();
    }
    debug!(theme.id = doc.id().unwrap_or("<unnamed>"), "migrating legacy theme");

    let mut root = match doc.root() {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    let mut semantic = Map::new();
    let mut status = Map::new();
    let mut charts = Map::new();
    let mut sidebar = Map::new();

    for mode in Mode::ALL {
        let colors = doc.mode_section("colors", mode);
        let mut tokens = Map::new();
        let mut chart = Map::new();
        let mut side = Map::new();

        for (key, value) in colors.into_iter().flatten() {
            let key = canonical_name(key);
            if let Some(rest) = key.strip_prefix("sidebar-") {
                side.insert(rest.to_string(), value.clone());
            } else if key.starts_with("chart-") {
                chart.insert(key, value.clone());
            } else {
                tokens.insert(key, value.clone());
            }
        }

        for (token, chain) in FALLBACK_CHAINS {
            if tokens.contains_key(*token) {
                continue;
            }
            if let Some(source) = chain.iter().find(|t| tokens.contains_key(**t)) {
                let path = format!("semanticTokens.{}.{}", mode.as_str(), source);
                tokens.insert(token.to_string(), reference(&path));
            }
        }

        let mut mode_status = Map::new();
        for (name, light, dark) in DEFAULT_STATUS_COLORS {
            let value = match mode {
                Mode::Light => light,
                Mode::Dark => dark,
            };
            mode_status.insert(name.to_string(), Value::String(value.to_string()));
        }

        semantic.insert(mode.as_str().to_string(), Value::Object(tokens));
        status.insert(mode.as_str().to_string(), Value::Object(mode_status));
        if !chart.is_empty() {
            charts.insert(mode.as_str().to_string(), Value::Object(chart));
        }
        if !side.is_empty() {
            sidebar.insert(mode.as_str().to_string(), Value::Object(side));
        }
    }

    root.insert("version".into(), Value::String("2".into()));
    root.insert("semanticTokens".into(), Value::Object(semantic));
    root.insert("statusColors".into(), Value::Object(status));
    if !charts.is_empty() {
        root.insert("chartColors".into(), Value::Object(charts));
    }
    if !sidebar.is_empty() {
        root.insert("sidebarTokens".into(), Value::Object(sidebar));
    }

    if let Some(fonts) = doc.section("fonts") {
        let typography = root
            .entry("typography")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(typography) = typography.as_object_mut() {
            typography
                .entry("fonts")
                .or_insert_with(|| Value::Object(fonts.clone()));
        }
    }
    if let Some(radius) = doc.root().get("radius").filter(|v| !v.is_object()) {
        let spacing = root
            .entry("spacing")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(spacing) = spacing.as_object_mut() {
            spacing.entry("radius").or_insert_with(|| radius.clone());
        }
    }

    ThemeDocument::from_value(Value::Object(root)).unwrap_or_else(|_| doc.clone())
}

/// Normalizes a legacy key: kebab-case, digits split from letters
/// (`chart1` → `chart-1`), then [`LEGACY_ALIASES`].
fn canonical_name(key: &str) -> String {
    let kebab = to_kebab_case(key);
    let mut out = String::with_capacity(kebab.len() + 2);
    let mut prev_alpha = false;
    for ch in kebab.chars() {
        if ch.is_ascii_digit() && prev_alpha {
            out.push('-');
        }
        prev_alpha = ch.is_ascii_alphabetic();
        out.push(ch);
    }
    LEGACY_ALIASES
        .iter()
        .find(|(from, _)| *from == out)
        .map(|(_, to)| to.to_string())
        .unwrap_or(out)
}
