//! Structural and referential checks over a theme document.
//!
//! Generation is best-effort and never rejects a document; this is where
//! problems are reported. [`validate`] never fails: findings are collected
//! into a [`ValidationReport`].
//!
//! | Finding | Severity |
//! |---------|----------|
//! | missing `id`, `name`, `category` or `version` | error |
//! | `id` not matching `^[a-z0-9-]+$` | error |
//! | scale without `steps.light` or `steps.dark` | error |
//! | missing `semanticTokens.light` / `.dark` | error |
//! | missing core token (`background`, `foreground`, `primary`) | error |
//! | light-mode semantic pointer that does not resolve | error |
//! | section above the size limits (scales, token sets, gradients, animations, keyframes) | error |
//! | scale without an alpha table for a mode | warning |
//! | semantic token defined in only one mode | warning |
//! | legacy schema | warning |
//! | unknown declared version | warning |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{
    Mode, SchemaVersion, ThemeDocument, MAX_ANIMATIONS, MAX_SCALES, MAX_TOKENS_PER_SET,
};
use crate::reference::{is_reference, resolve, Visited};
use crate::scale::step_table;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Fields every document must carry.
pub const REQUIRED_FIELDS: &[&str] = &["id", "name", "category", "version"];

/// Semantic tokens every mode must define.
pub const CORE_TOKENS: &[&str] = &["background", "foreground", "primary"];

/// Sections whose per-mode entry count is limited.
const MODE_SETS: &[&str] = &["semanticTokens", "statusColors", "chartColors", "sidebarTokens"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Checks `doc` and reports every problem found.
pub fn validate(doc: &ThemeDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_required(doc, &mut report);

    match doc.declared_version().as_deref() {
        None | Some("1") | Some("2") => {}
        Some(other) => report.warn(format!("unknown version '{other}'; expected \"1\" or \"2\"")),
    }

    match doc.detect_version() {
        SchemaVersion::Legacy => check_legacy(doc, &mut report),
        SchemaVersion::Canonical => {
            check_scales(doc, &mut report);
            check_semantic_tokens(doc, &mut report);
            check_limits(doc, &mut report);
        }
    }

    report.valid = report.errors.is_empty();
    report
}

fn check_required(doc: &ThemeDocument, report: &mut ValidationReport) {
    for field in REQUIRED_FIELDS {
        let present = match doc.root().get(*field) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Number(_)) => *field == "version",
            _ => false,
        };
        if !present {
            report.error(format!("missing required field '{field}'"));
        }
    }
    if let Some(id) = doc.id() {
        if !id.is_empty() && !ID_PATTERN.is_match(id) {
            report.error(format!(
                "invalid id '{id}': use lowercase letters, digits and hyphens"
            ));
        }
    }
}

fn check_legacy(doc: &ThemeDocument, report: &mut ValidationReport) {
    report.warn("legacy schema (version 1); the theme will be migrated to version 2");
    for mode in Mode::ALL {
        if doc.mode_section("colors", mode).is_none() {
            report.error(format!("missing colors.{mode}"));
        }
    }
}

fn check_scales(doc: &ThemeDocument, report: &mut ValidationReport) {
    let Some(scales) = doc.section("scales") else {
        return;
    };
    for (name, scale) in scales {
        for mode in Mode::ALL {
            if step_table(scale, "steps", mode).is_none() {
                report.error(format!("scale '{name}' is missing steps.{mode}"));
            }
            if step_table(scale, "alpha", mode).is_none() {
                report.warn(format!("scale '{name}' has no alpha.{mode} table"));
            }
        }
    }
}

fn check_semantic_tokens(doc: &ThemeDocument, report: &mut ValidationReport) {
    let light = doc.mode_section("semanticTokens", Mode::Light);
    let dark = doc.mode_section("semanticTokens", Mode::Dark);

    for (mode, tokens) in [(Mode::Light, light), (Mode::Dark, dark)] {
        let Some(tokens) = tokens else {
            report.error(format!("missing semanticTokens.{mode}"));
            continue;
        };
        for token in CORE_TOKENS {
            if !tokens.contains_key(*token) {
                report.error(format!("semanticTokens.{mode} is missing core token '{token}'"));
            }
        }
    }

    if let (Some(light), Some(dark)) = (light, dark) {
        report_asymmetry(light, dark, Mode::Light, Mode::Dark, report);
        report_asymmetry(dark, light, Mode::Dark, Mode::Light, report);
    }

    if let Some(light) = light {
        for (name, value) in light {
            if !is_reference(value) {
                continue;
            }
            if let Err(err) = resolve(value, doc.root(), &Visited::new(), 0) {
                report.error(format!("semanticTokens.light.{name}: {err}"));
            }
        }
    }
}

fn report_asymmetry(
    from: &Map<String, Value>,
    other: &Map<String, Value>,
    from_mode: Mode,
    other_mode: Mode,
    report: &mut ValidationReport,
) {
    for name in from.keys().filter(|k| !other.contains_key(*k)) {
        report.warn(format!(
            "token '{name}' is defined in {from_mode} mode but not in {other_mode} mode"
        ));
    }
}

fn check_limits(doc: &ThemeDocument, report: &mut ValidationReport) {
    if let Some(scales) = doc.section("scales") {
        if scales.len() > MAX_SCALES {
            report.error(format!("{} scales exceed the limit of {MAX_SCALES}", scales.len()));
        }
    }
    for section in MODE_SETS {
        let Some(map) = doc.section(section) else {
            continue;
        };
        let sets = Mode::ALL
            .iter()
            .filter_map(|m| map.get(m.as_str()).and_then(Value::as_object).map(|s| (m.as_str(), s)));
        for (mode, set) in sets.chain(std::iter::once(("shared", map))) {
            check_set_size(&format!("{section}.{mode}"), set, report);
        }
    }
    if let Some(effects) = doc.section("effects") {
        let blocks = Mode::ALL
            .iter()
            .filter_map(|m| effects.get(m.as_str()).and_then(Value::as_object).map(|e| (format!("effects.{m}"), e)));
        for (label, block) in std::iter::once(("effects".to_string(), effects)).chain(blocks) {
            if let Some(gradients) = block.get("gradients").and_then(Value::as_object) {
                check_set_size(&format!("{label}.gradients"), gradients, report);
            }
        }
    }
    if let Some(animations) = doc.section("animations") {
        if animations.len() > MAX_ANIMATIONS {
            report.error(format!(
                "{} animations exceed the limit of {MAX_ANIMATIONS}",
                animations.len()
            ));
        }
        for (name, animation) in animations {
            let Some(frames) = animation.get("keyframes").and_then(Value::as_object) else {
                continue;
            };
            let label = format!("animations.{name}.keyframes");
            check_set_size(&label, frames, report);
            for (selector, block) in frames {
                if let Some(block) = block.as_object() {
                    check_set_size(&format!("{label}.{selector}"), block, report);
                }
            }
        }
    }
}

fn check_set_size(label: &str, set: &Map<String, Value>, report: &mut ValidationReport) {
    if set.len() > MAX_TOKENS_PER_SET {
        report.error(format!(
            "{label} has {} entries, above the limit of {MAX_TOKENS_PER_SET}",
            set.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_steps() -> Value {
        Value::Array((1..=12).map(|i| json!(format!("#0000{i:02}"))).collect())
    }

    fn valid_doc() -> Value {
        json!({
            "id": "ocean",
            "name": "Ocean",
            "category": "cool",
            "version": "2",
            "scales": {
                "teal": {
                    "steps": { "light": full_steps(), "dark": full_steps() },
                    "alpha": { "light": full_steps(), "dark": full_steps() }
                }
            },
            "semanticTokens": {
                "light": {
                    "background": "#fff",
                    "foreground": "#000",
                    "primary": { "$ref": "scales.teal.steps.light.8" }
                },
                "dark": {
                    "background": "#000",
                    "foreground": "#fff",
                    "primary": { "$ref": "scales.teal.steps.dark.8" }
                }
            }
        })
    }

    fn check(value: Value) -> ValidationReport {
        validate(&ThemeDocument::from_value(value).unwrap())
    }

    #[test]
    fn test_valid_document() {
        let report = check(valid_doc());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_missing_required_fields_and_bad_id() {
        let mut doc = valid_doc();
        doc["id"] = json!("Ocean Theme");
        doc.as_object_mut().unwrap().remove("category");
        let report = check(doc);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("invalid id 'Ocean Theme'")));
        assert!(report.errors.iter().any(|e| e.contains("'category'")));
    }

    #[test]
    fn test_numeric_version_is_accepted() {
        let mut doc = valid_doc();
        doc["version"] = json!(2);
        assert!(check(doc).valid);
    }

    #[test]
    fn test_incomplete_scale() {
        let mut doc = valid_doc();
        doc["scales"]["teal"]["steps"].as_object_mut().unwrap().remove("dark");
        doc["scales"]["teal"].as_object_mut().unwrap().remove("alpha");
        let report = check(doc);
        assert!(report.errors.iter().any(|e| e == "scale 'teal' is missing steps.dark"));
        assert_eq!(report.warnings.iter().filter(|w| w.contains("alpha")).count(), 2);
    }

    #[test]
    fn test_missing_modes_and_core_tokens() {
        let mut doc = valid_doc();
        doc["semanticTokens"].as_object_mut().unwrap().remove("dark");
        doc["semanticTokens"]["light"].as_object_mut().unwrap().remove("foreground");
        let report = check(doc);
        assert!(report.errors.iter().any(|e| e == "missing semanticTokens.dark"));
        assert!(report.errors.iter().any(|e| e.contains("missing core token 'foreground'")));
    }

    #[test]
    fn test_unresolvable_light_pointers_are_errors() {
        let mut doc = valid_doc();
        doc["semanticTokens"]["light"]["ring"] = json!({ "$ref": "scales.violet.steps.light.8" });
        doc["semanticTokens"]["light"]["loop"] = json!({ "$ref": "semanticTokens.light.loop" });
        doc["semanticTokens"]["light"]["evil"] = json!({ "$ref": "constructor.prototype" });
        let report = check(doc);

        assert!(report.errors.iter().any(|e| e.starts_with("semanticTokens.light.ring:") && e.contains("violet")));
        assert!(report.errors.iter().any(|e| e.starts_with("semanticTokens.light.loop:") && e.contains("circular")));
        assert!(report.errors.iter().any(|e| e.starts_with("semanticTokens.light.evil:") && e.contains("unsafe")));
        // The extra light tokens have no dark counterpart.
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_asymmetric_tokens_warn() {
        let mut doc = valid_doc();
        doc["semanticTokens"]["dark"]["border"] = json!("#333");
        let report = check(doc);
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec!["token 'border' is defined in dark mode but not in light mode"]
        );
    }

    #[test]
    fn test_legacy_and_unknown_version_warn() {
        let report = check(json!({
            "id": "paper",
            "name": "Paper",
            "category": "light",
            "version": "0.9",
            "colors": { "light": { "background": "#fff" } }
        }));
        assert!(report.warnings.iter().any(|w| w.contains("unknown version '0.9'")));
        assert!(report.warnings.iter().any(|w| w.contains("legacy schema")));
        assert!(report.errors.iter().any(|e| e == "missing colors.dark"));
    }

    #[test]
    fn test_size_limits() {
        let mut doc = valid_doc();
        let big: Map<String, Value> = (0..=MAX_TOKENS_PER_SET)
            .map(|i| (format!("t{i}"), json!("#000")))
            .collect();
        doc["statusColors"] = json!({ "light": Value::Object(big) });
        let report = check(doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("statusColors.light has 513 entries")));
    }

    #[test]
    fn test_gradient_and_keyframe_limits() {
        let mut doc = valid_doc();
        let many = |value: Value| -> Value {
            Value::Object(
                (0..=MAX_TOKENS_PER_SET)
                    .map(|i| (format!("k{i}"), value.clone()))
                    .collect(),
            )
        };
        doc["effects"] = json!({ "dark": { "gradients": many(json!({ "from": "#fff", "to": "#000" })) } });
        doc["animations"] = json!({
            "busy": { "keyframes": { "from": many(json!("1")) } }
        });
        let report = check(doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("effects.dark.gradients has 513 entries")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("animations.busy.keyframes.from has 513 entries")));
        assert!(!report.errors.iter().any(|e| e.starts_with("animations.busy.keyframes has")));
    }
}
