//! Theme processing: the pipeline from document to resolved variables.
//!
//! [`process_theme`] detects the schema and picks a pipeline:
//!
//! - legacy document, `force_v2` off: raw `colors.{mode}` are passed through
//!   (no scales, effects or animations)
//! - otherwise: the document is migrated if needed and the canonical
//!   pipeline runs
//!
//! The canonical pipeline runs these stages per requested mode, in order.
//! When two stages produce the same variable, the later one wins.
//!
//! 1. scale expansion
//! 2. semantic tokens
//! 3. status colors
//! 4. chart colors
//! 5. sidebar tokens (`sidebar-` prefix)
//! 6. effects
//!
//! Typography, spacing and animations are mode independent and land in
//! [`ResolvedTheme::global`].
//!
//! Pointer failures never abort a batch: the failing entry keeps its
//! unresolved literal and a warning is logged. The source document is never
//! modified, and each mode builds its own map.

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{limited, literal, Mode, ModeSelection, SchemaVersion, ThemeDocument};
use crate::effects::{
    animation_variables, collect_animations, effects_for_mode, flatten_effects, resolve_or_keep,
    to_kebab_case,
};
use crate::emit::css;
use crate::migrate::migrate;
use crate::options::CssOptions;
use crate::reference::is_reference;
use crate::scale::{expand, scale_names};
use crate::variables::{ResolvedTheme, Stage, VariableMap};

/// Fallback theme id for documents without one.
pub const DEFAULT_THEME_ID: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Run the canonical pipeline even for legacy documents.
    pub force_v2: bool,
    pub mode: ModeSelection,
}

/// Result of [`process_theme`].
#[derive(Debug, Clone)]
pub struct ProcessedTheme {
    /// Pipeline that produced the output.
    pub version: SchemaVersion,
    /// Default rendering (CSS custom properties).
    pub css: String,
    pub resolved: ResolvedTheme,
    /// The document the pipeline read: migrated when the canonical
    /// pipeline ran on a legacy input, otherwise a copy of the input.
    pub document: ThemeDocument,
}

/// Resolves a theme document into variables for the requested modes.
pub fn process_theme(doc: &ThemeDocument, options: &ProcessOptions) -> ProcessedTheme {
    let detected = doc.detect_version();
    let (version, document, resolved) = if detected == SchemaVersion::Legacy && !options.force_v2 {
        (SchemaVersion::Legacy, doc.clone(), legacy_pipeline(doc, options.mode))
    } else {
        let normalized = migrate(doc);
        let resolved = canonical_pipeline(&normalized, options.mode);
        (SchemaVersion::Canonical, normalized, resolved)
    };

    debug!(
        theme.id = %resolved.id,
        version = version.as_str(),
        light = resolved.light.len(),
        dark = resolved.dark.len(),
        global = resolved.global.len(),
        "theme processed"
    );

    let css = css::render(&resolved, &CssOptions::default());
    ProcessedTheme {
        version,
        css,
        resolved,
        document,
    }
}

fn new_resolved(doc: &ThemeDocument, version: SchemaVersion, modes: ModeSelection) -> ResolvedTheme {
    let id = doc.id().unwrap_or(DEFAULT_THEME_ID);
    let name = doc.name().unwrap_or(id);
    let mut resolved = ResolvedTheme::new(id, name, version);
    resolved.modes = modes;
    resolved
}

fn legacy_pipeline(doc: &ThemeDocument, modes: ModeSelection) -> ResolvedTheme {
    let mut resolved = new_resolved(doc, SchemaVersion::Legacy, modes);

    for &mode in modes.modes() {
        let map = resolved.mode_mut(mode);
        for (key, value) in limited(doc.mode_section("colors", mode), "colors") {
            if let Some(text) = literal(value) {
                map.insert(to_kebab_case(key), text, Stage::Legacy);
            }
        }
    }

    if let Some(fonts) = doc.section("fonts") {
        for (name, value) in fonts {
            if let Some(text) = font_literal(value) {
                resolved.global.insert(format!("font-{name}"), text, Stage::Typography);
            }
        }
    }
    if let Some(radius) = doc.root().get("radius").and_then(literal) {
        resolved.global.insert("radius", radius, Stage::Spacing);
    }

    resolved
}

fn canonical_pipeline(doc: &ThemeDocument, modes: ModeSelection) -> ResolvedTheme {
    let root = doc.root();
    let mut resolved = new_resolved(doc, SchemaVersion::Canonical, modes);

    if let Some(scales) = doc.section("scales") {
        resolved.scale_names = scale_names(scales);
    }

    for &mode in modes.modes() {
        let mut map = VariableMap::new();

        if let Some(scales) = doc.section("scales") {
            map.merge(expand(scales, mode));
        }
        map.merge(resolve_set(
            doc.mode_section("semanticTokens", mode),
            root,
            Stage::Semantic,
            |name| name.to_string(),
        ));
        map.merge(resolve_set(
            doc.mode_section("statusColors", mode),
            root,
            Stage::Status,
            |name| name.to_string(),
        ));
        map.merge(resolve_set(
            chart_colors(doc, mode),
            root,
            Stage::Chart,
            chart_key,
        ));
        map.merge(resolve_set(
            doc.mode_section("sidebarTokens", mode),
            root,
            Stage::Sidebar,
            |name| format!("sidebar-{name}"),
        ));
        if let Some(effects) = doc.section("effects") {
            map.merge(flatten_effects(effects_for_mode(effects, mode), root));
        }

        *resolved.mode_mut(mode) = map;
    }

    resolved.global.merge(typography_variables(doc));
    resolved.global.merge(spacing_variables(doc));
    if let Some(animations) = doc.section("animations") {
        resolved.animations = collect_animations(animations, root);
        resolved.global.merge(animation_variables(&resolved.animations));
    }

    resolved
}

/// `chartColors.{mode}` when present, else the shared `chartColors` map.
fn chart_colors(doc: &ThemeDocument, mode: Mode) -> Option<&Map<String, Value>> {
    doc.mode_section("chartColors", mode)
        .or_else(|| doc.section("chartColors"))
}

fn chart_key(name: &str) -> String {
    if name.starts_with("chart-") {
        name.to_string()
    } else {
        format!("chart-{name}")
    }
}

fn resolve_set(
    set: Option<&Map<String, Value>>,
    root: &Value,
    stage: Stage,
    key: impl Fn(&str) -> String,
) -> VariableMap {
    let mut out = VariableMap::new();
    for (name, value) in limited(set, stage_label(stage)) {
        if stage == Stage::Chart && is_mode_block(name, value) {
            continue;
        }
        let variable = key(name);
        if let Some(text) = resolve_or_keep(value, root, &variable) {
            out.insert(variable, text, stage);
        }
    }
    out
}

/// A `light`/`dark` block inside the shared `chartColors` map. Pointers are
/// tokens, whatever their name.
fn is_mode_block(name: &str, value: &Value) -> bool {
    Mode::ALL.iter().any(|m| m.as_str() == name) && value.is_object() && !is_reference(value)
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Semantic => "semanticTokens",
        Stage::Status => "statusColors",
        Stage::Chart => "chartColors",
        Stage::Sidebar => "sidebarTokens",
        _ => "tokens",
    }
}

fn typography_variables(doc: &ThemeDocument) -> VariableMap {
    let mut out = VariableMap::new();
    let Some(typography) = doc.section("typography") else {
        return out;
    };

    for (group, prefix) in [
        ("fonts", "font"),
        ("weights", "font-weight"),
        ("sizes", "font-size"),
        ("lineHeights", "line-height"),
    ] {
        let Some(entries) = typography.get(group).and_then(Value::as_object) else {
            continue;
        };
        for (name, value) in limited(Some(entries), group) {
            if let Some(text) = font_literal(value) {
                out.insert(format!("{prefix}-{name}"), text, Stage::Typography);
            }
        }
    }
    out
}

fn spacing_variables(doc: &ThemeDocument) -> VariableMap {
    let mut out = VariableMap::new();
    let Some(spacing) = doc.section("spacing") else {
        return out;
    };

    if let Some(radius) = spacing.get("radius").and_then(literal) {
        out.insert("radius", radius, Stage::Spacing);
    }
    for (group, prefix) in [("radii", "radius"), ("scale", "spacing")] {
        let Some(entries) = spacing.get(group).and_then(Value::as_object) else {
            continue;
        };
        for (name, value) in limited(Some(entries), group) {
            if let Some(text) = literal(value) {
                out.insert(format!("{prefix}-{name}"), text, Stage::Spacing);
            }
        }
    }
    out
}

/// Font stacks may be written as arrays; they are joined with `", "`.
fn font_literal(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(literal).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => literal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ocean() -> ThemeDocument {
        ThemeDocument::from_value(json!({
            "id": "ocean",
            "name": "Ocean",
            "category": "cool",
            "version": "2",
            "scales": {
                "teal": { "steps": { "light": { "1": "H1" }, "dark": { "1": "D1" } } }
            },
            "semanticTokens": {
                "light": { "primary": { "$ref": "scales.teal.steps.light.1" } },
                "dark": { "primary": { "$ref": "scales.teal.steps.dark.1" } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_resolves_per_mode() {
        let processed = process_theme(&ocean(), &ProcessOptions::default());
        assert_eq!(processed.version, SchemaVersion::Canonical);
        assert_eq!(processed.resolved.light.get("primary"), Some("H1"));
        assert_eq!(processed.resolved.dark.get("primary"), Some("D1"));
        assert_eq!(processed.resolved.light.get("teal-1"), Some("H1"));
        assert!(processed.css.contains("--primary: H1;"));
    }

    #[test]
    fn test_source_document_is_untouched() {
        let doc = ocean();
        let before = doc.clone();
        let _ = process_theme(&doc, &ProcessOptions::default());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_mode_selection_limits_output() {
        let options = ProcessOptions {
            mode: ModeSelection::Dark,
            ..Default::default()
        };
        let processed = process_theme(&ocean(), &options);
        assert!(processed.resolved.light.is_empty());
        assert_eq!(processed.resolved.dark.get("primary"), Some("D1"));
    }

    #[test]
    fn test_later_stage_wins_on_collision() {
        let doc = ThemeDocument::from_value(json!({
            "scales": { "chart": { "steps": { "light": { "1": "from-scale" } } } },
            "semanticTokens": { "light": { "chart-1": "from-semantic", "glow": "from-semantic" } },
            "chartColors": { "1": "from-chart" },
            "effects": { "glow": { "default": "from-effects" } }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        let light = &processed.resolved.light;
        assert_eq!(light.get("chart-1"), Some("from-chart"));
        assert_eq!(light.variable("chart-1").map(|v| v.stage), Some(Stage::Chart));
        assert_eq!(light.get("glow"), Some("from-effects"));
    }

    #[test]
    fn test_failed_pointer_keeps_literal_and_continues() {
        let doc = ThemeDocument::from_value(json!({
            "semanticTokens": {
                "light": {
                    "primary": { "$ref": "scales.missing.1" },
                    "border": "#e4e4e7"
                }
            }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        assert_eq!(processed.resolved.light.get("primary"), Some("scales.missing.1"));
        assert_eq!(processed.resolved.light.get("border"), Some("#e4e4e7"));
    }

    #[test]
    fn test_sidebar_status_chart_and_globals() {
        let doc = ThemeDocument::from_value(json!({
            "id": "x",
            "statusColors": { "light": { "success": "#0f0" } },
            "chartColors": { "light": { "chart-1": "#f00" }, "dark": { "chart-1": "#a00" } },
            "sidebarTokens": { "light": { "background": "#fafafa" } },
            "typography": {
                "fonts": { "sans": ["Inter", "system-ui"] },
                "weights": { "bold": 700 }
            },
            "spacing": { "radius": "0.5rem", "scale": { "4": "1rem" } },
            "animations": { "spin": { "duration": "1s", "easing": "linear", "iteration": "infinite" } }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        let r = &processed.resolved;

        assert_eq!(r.light.get("success"), Some("#0f0"));
        assert_eq!(r.light.get("chart-1"), Some("#f00"));
        assert_eq!(r.dark.get("chart-1"), Some("#a00"));
        assert_eq!(r.light.get("sidebar-background"), Some("#fafafa"));
        assert_eq!(r.global.get("font-sans"), Some("Inter, system-ui"));
        assert_eq!(r.global.get("font-weight-bold"), Some("700"));
        assert_eq!(r.global.get("radius"), Some("0.5rem"));
        assert_eq!(r.global.get("spacing-4"), Some("1rem"));
        assert_eq!(r.global.get("animation-spin"), Some("spin 1s linear infinite"));
    }

    fn legacy() -> ThemeDocument {
        ThemeDocument::from_value(json!({
            "id": "paper",
            "version": "1",
            "colors": {
                "light": { "background": "#fff", "primaryForeground": "#000", "muted": "#eee" },
                "dark": { "background": "#000" }
            },
            "fonts": { "sans": "Inter" },
            "radius": "4px"
        }))
        .unwrap()
    }

    #[test]
    fn test_legacy_pipeline_passes_colors_through() {
        let processed = process_theme(&legacy(), &ProcessOptions::default());
        assert_eq!(processed.version, SchemaVersion::Legacy);
        let r = &processed.resolved;
        assert_eq!(r.light.get("primary-foreground"), Some("#000"));
        assert!(r.light.get("surface").is_none());
        assert!(r.light.get("success").is_none());
        assert_eq!(r.global.get("font-sans"), Some("Inter"));
        assert_eq!(r.global.get("radius"), Some("4px"));
        assert_eq!(processed.document, legacy());
    }

    #[test]
    fn test_force_v2_migrates_legacy() {
        let options = ProcessOptions {
            force_v2: true,
            ..Default::default()
        };
        let processed = process_theme(&legacy(), &options);
        assert_eq!(processed.version, SchemaVersion::Canonical);
        let r = &processed.resolved;
        assert_eq!(r.light.get("surface"), Some("#eee"));
        assert_eq!(r.dark.get("surface"), Some("#000"));
        assert_eq!(r.light.get("success"), Some("#16a34a"));
        assert!(processed.document.is_canonical());
    }

    #[test]
    fn test_malformed_sections_are_ignored() {
        let doc = ThemeDocument::from_value(json!({
            "scales": "nope",
            "semanticTokens": { "light": ["a"], "dark": 3 },
            "effects": { "glass": 1, "gradients": [] },
            "animations": { "x": "y" },
            "typography": { "fonts": "Inter" }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        assert_eq!(processed.resolved.id, DEFAULT_THEME_ID);
        assert!(processed.resolved.light.is_empty());
        assert!(processed.resolved.animations.is_empty());
    }

    #[test]
    fn test_tokens_named_after_modes_are_kept() {
        let doc = ThemeDocument::from_value(json!({
            "scales": { "teal": { "steps": { "light": ["#f0fdfa"], "dark": ["#042f2e"] } } },
            "semanticTokens": {
                "light": { "dark": { "$ref": "scales.teal.steps.light.0" }, "light": "#fff" }
            },
            "statusColors": { "light": { "dark": { "$ref": "scales.teal.steps.light.0" } } },
            "sidebarTokens": { "light": { "light": { "$ref": "scales.teal.steps.light.0" } } }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        let light = &processed.resolved.light;

        assert_eq!(light.get("dark"), Some("#f0fdfa"));
        assert_eq!(light.variable("dark").map(|v| v.stage), Some(Stage::Status));
        assert_eq!(light.get("light"), Some("#fff"));
        assert_eq!(light.get("sidebar-light"), Some("#f0fdfa"));
    }

    #[test]
    fn test_shared_chart_colors_skip_mode_blocks_only() {
        let doc = ThemeDocument::from_value(json!({
            "semanticTokens": { "light": { "primary": "#0d9488" } },
            "chartColors": {
                "1": "#f97316",
                "dark": { "$ref": "semanticTokens.light.primary" }
            }
        }))
        .unwrap();
        let processed = process_theme(&doc, &ProcessOptions::default());
        assert_eq!(processed.resolved.light.get("chart-1"), Some("#f97316"));
        assert_eq!(processed.resolved.light.get("chart-dark"), Some("#0d9488"));

        let split = ThemeDocument::from_value(json!({
            "chartColors": { "2": "#111", "dark": { "2": "#222" } }
        }))
        .unwrap();
        let processed = process_theme(&split, &ProcessOptions::default());
        assert_eq!(processed.resolved.light.get("chart-2"), Some("#111"));
        assert!(!processed.resolved.light.contains("chart-dark"));
        assert_eq!(processed.resolved.dark.get("chart-2"), Some("#222"));
    }
}
