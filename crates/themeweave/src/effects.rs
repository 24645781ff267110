//! Effect and animation flattening.
//!
//! Effects become flat variables:
//!
//! | Source | Variables |
//! |--------|-----------|
//! | `glass { background, blur, border }` | `glass-background`, `glass-blur`, `glass-border` |
//! | `glow { default, large, color }` | `glow`, `glow-large`, `glow-color` |
//! | `gradients.{name} { from, to, direction }` | `gradient-{name}-from`, `-to`, `-direction`, `gradient-{name}` |
//!
//! Any of these values may be a reference pointer. A gradient whose `from`
//! or `to` fails to resolve is dropped with a warning; other failures keep
//! the unresolved literal.
//!
//! Animations produce one `animation-{name}` shorthand each and keep their
//! keyframe stages for dedicated `@keyframes` output.

use serde_json::{Map, Value};
use tracing::warn;

use crate::document::{limited, literal, Mode, MAX_ANIMATIONS};
use crate::reference::{resolve_literal, unresolved_literal};
use crate::variables::{AnimationSpec, EffectSlot, GradientPart, KeyframeStage, Stage, VariableMap};

pub const DEFAULT_DURATION: &str = "0.2s";
pub const DEFAULT_EASING: &str = "ease-out";
pub const DEFAULT_GRADIENT_DIRECTION: &str = "to right";

/// Picks the effect definitions for `mode`.
///
/// `effects.{light|dark}` overrides the shared definition when present.
pub fn effects_for_mode(effects: &Map<String, Value>, mode: Mode) -> &Map<String, Value> {
    effects
        .get(mode.as_str())
        .and_then(Value::as_object)
        .unwrap_or(effects)
}

/// Flattens glass, glow and gradient definitions into variables.
pub fn flatten_effects(effects: &Map<String, Value>, root: &Value) -> VariableMap {
    let mut out = VariableMap::new();

    if let Some(glass) = effects.get("glass").and_then(Value::as_object) {
        for (field, key) in [
            ("background", "glass-background"),
            ("blur", "glass-blur"),
            ("border", "glass-border"),
        ] {
            if let Some(value) = glass.get(field) {
                if let Some(text) = resolve_or_keep(value, root, key) {
                    let slot = EffectSlot::Glass {
                        part: field.to_string(),
                    };
                    out.insert_effect(key, text, slot);
                }
            }
        }
    }

    if let Some(glow) = effects.get("glow").and_then(Value::as_object) {
        for (field, key) in [
            ("default", "glow"),
            ("large", "glow-large"),
            ("color", "glow-color"),
        ] {
            if let Some(value) = glow.get(field) {
                if let Some(text) = resolve_or_keep(value, root, key) {
                    let slot = EffectSlot::Glow {
                        variant: field.to_string(),
                    };
                    out.insert_effect(key, text, slot);
                }
            }
        }
    }

    let gradients = effects.get("gradients").and_then(Value::as_object);
    for (name, gradient) in limited(gradients, "effects.gradients") {
        flatten_gradient(name, gradient, root, &mut out);
    }

    out
}

fn flatten_gradient(name: &str, gradient: &Value, root: &Value, out: &mut VariableMap) {
    let endpoint = |field: &str| -> Option<String> {
        let value = gradient.get(field)?;
        match resolve_literal(value, root) {
            Ok(text) => text,
            Err(err) => {
                warn!(gradient = %name, field, error = %err, "gradient endpoint unresolved");
                None
            }
        }
    };

    let (Some(from), Some(to)) = (endpoint("from"), endpoint("to")) else {
        warn!(gradient = %name, "gradient dropped: `from` and `to` must both resolve");
        return;
    };
    let direction = gradient
        .get("direction")
        .and_then(literal)
        .unwrap_or_else(|| DEFAULT_GRADIENT_DIRECTION.to_string());

    let css = format!("linear-gradient({direction}, {from}, {to})");
    for (part, value) in [
        (GradientPart::Css, css),
        (GradientPart::From, from),
        (GradientPart::To, to),
        (GradientPart::Direction, direction),
    ] {
        let key = match part {
            GradientPart::Css => format!("gradient-{name}"),
            part => format!("gradient-{name}-{}", part.as_str()),
        };
        let slot = EffectSlot::Gradient {
            name: name.to_string(),
            part,
        };
        out.insert_effect(key, value, slot);
    }
}

/// Builds an [`AnimationSpec`] per animation, in document order.
pub fn collect_animations(animations: &Map<String, Value>, root: &Value) -> Vec<AnimationSpec> {
    if animations.len() > MAX_ANIMATIONS {
        warn!(
            count = animations.len(),
            limit = MAX_ANIMATIONS,
            "too many animations; extra animations are ignored"
        );
    }

    animations
        .iter()
        .take(MAX_ANIMATIONS)
        .filter_map(|(name, def)| {
            let def = def.as_object()?;
            let text = |field: &str| def.get(field).and_then(literal);
            Some(AnimationSpec {
                name: name.clone(),
                duration: text("duration").unwrap_or_else(|| DEFAULT_DURATION.to_string()),
                easing: text("easing").unwrap_or_else(|| DEFAULT_EASING.to_string()),
                iteration: text("iteration").or_else(|| text("iterationCount")),
                keyframes: def
                    .get("keyframes")
                    .and_then(Value::as_object)
                    .map(|frames| keyframe_stages(name, frames, root))
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// The `animation-{name}` shorthand variables for `specs`.
pub fn animation_variables(specs: &[AnimationSpec]) -> VariableMap {
    let mut out = VariableMap::new();
    for spec in specs {
        out.insert(
            format!("animation-{}", spec.name),
            spec.shorthand(),
            Stage::Animation,
        );
    }
    out
}

fn keyframe_stages(animation: &str, frames: &Map<String, Value>, root: &Value) -> Vec<KeyframeStage> {
    let label = format!("animations.{animation}.keyframes");
    limited(Some(frames), &label)
        .filter_map(|(selector, block)| {
            let block = block.as_object()?;
            let properties = limited(Some(block), &format!("{label}.{selector}"))
                .filter_map(|(prop, value)| {
                    let key = format!("{animation}.{selector}.{prop}");
                    Some((to_kebab_case(prop), resolve_or_keep(value, root, &key)?))
                })
                .collect();
            Some(KeyframeStage {
                selector: normalize_selector(selector),
                properties,
            })
        })
        .collect()
}

/// Bare numbers become percentages; keywords and percentages stay.
fn normalize_selector(selector: &str) -> String {
    let trimmed = selector.trim();
    if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
        format!("{trimmed}%")
    } else {
        trimmed.to_string()
    }
}

/// Converts `camelCase` / `snake_case` property names to `kebab-case`.
///
/// A leading capital marks a vendor prefix: `WebkitTransform` becomes
/// `-webkit-transform`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i == 0 || !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn resolve_or_keep(value: &Value, root: &Value, key: &str) -> Option<String> {
    match resolve_literal(value, root) {
        Ok(text) => text,
        Err(err) => {
            warn!(variable = %key, error = %err, "unresolved reference kept as literal");
            unresolved_literal(value)
        }
    }
}
