//! Tailwind config.
//!
//! The config extends the Tailwind theme with references to the CSS custom
//! properties, so it is meant to be used together with the `css` output:
//!
//! ```ts
//! const config = {
//!   darkMode: 'class',
//!   theme: {
//!     extend: {
//!       colors: {
//!         teal: { 1: 'var(--teal-1)', a1: 'var(--teal-a1)' },
//!         primary: 'var(--primary)',
//!       },
//!     },
//!   },
//! } satisfies Partial<Config>
//! ```
//!
//! Scale entries are grouped by the scale they came from (see
//! [`ResolvedTheme::split_scale_key`]); chart and sidebar colors get their
//! own groups. Keyframes are inlined with their literal values.

use std::fmt::Write as _;

use serde_json::{Map, Value};

use crate::error::EmitError;
use crate::options::TailwindVariant;
use crate::variables::{EffectSlot, GradientPart, ResolvedTheme, Stage};

use super::{classify_global, comment_text, EmitContext, GlobalKind, GENERATOR};

pub fn emit(ctx: &EmitContext<'_>) -> Result<String, EmitError> {
    let theme = ctx.theme;
    let options = &ctx.options.tailwind;

    let mut config = Map::new();
    config.insert("darkMode".into(), Value::String(options.dark_mode.clone()));
    let mut inner = Map::new();
    inner.insert("extend".into(), Value::Object(extend(theme)));
    config.insert("theme".into(), Value::Object(inner));

    let mut body = String::new();
    write_js(&Value::Object(config), 0, &mut body);

    let header = format!(
        "// {} ({})\n// Generated by {GENERATOR}. Do not edit.",
        comment_text(&theme.name),
        comment_text(&theme.id)
    );
    let out = match options.variant {
        TailwindVariant::TypeScript => format!(
            "import type {{ Config }} from 'tailwindcss'\n\n{header}\n\nconst config = {body} satisfies Partial<Config>\n\nexport default config\n"
        ),
        TailwindVariant::JavaScript => format!(
            "{header}\n\n/** @type {{import('tailwindcss').Config}} */\nmodule.exports = {body}\n"
        ),
    };
    Ok(out)
}

fn var(name: &str) -> Value {
    Value::String(format!("var(--{name})"))
}

/// Builds `theme.extend`; empty groups are omitted.
fn extend(theme: &ResolvedTheme) -> Map<String, Value> {
    let mut colors = Map::new();
    let mut background_image = Map::new();
    let mut box_shadow = Map::new();
    let mut backdrop_blur = Map::new();

    let modes = theme.light.iter().chain(theme.dark.iter());
    for (key, variable) in modes {
        match variable.stage {
            Stage::Scale => match theme.split_scale_key(key) {
                Some((scale, step)) => group_insert(&mut colors, scale, step, var(key)),
                None => set_leaf(&mut colors, key, var(key)),
            },
            Stage::Chart => {
                let name = key.strip_prefix("chart-").unwrap_or(key);
                group_insert(&mut colors, "chart", name, var(key));
            }
            Stage::Sidebar => {
                let name = key.strip_prefix("sidebar-").unwrap_or(key);
                group_insert(&mut colors, "sidebar", name, var(key));
            }
            Stage::Semantic | Stage::Status | Stage::Legacy => set_leaf(&mut colors, key, var(key)),
            Stage::Effect => match &variable.slot {
                Some(EffectSlot::Glass { part }) if part == "blur" => {
                    backdrop_blur.insert("glass".into(), var(key));
                }
                Some(EffectSlot::Glass { part }) => group_insert(&mut colors, "glass", part, var(key)),
                Some(EffectSlot::Glow { variant }) if variant == "color" => {
                    group_insert(&mut colors, "glow", "DEFAULT", var(key));
                }
                Some(EffectSlot::Glow { .. }) => {
                    box_shadow.insert(key.into(), var(key));
                }
                Some(EffectSlot::Gradient {
                    part: GradientPart::Css,
                    ..
                }) => {
                    background_image.insert(key.into(), var(key));
                }
                Some(EffectSlot::Gradient { .. }) | None => {}
            },
            _ => {}
        }
    }

    let mut groups: Vec<(&str, Map<String, Value>)> = vec![("colors", colors)];
    groups.extend(global_groups(theme));
    groups.push(("backgroundImage", background_image));
    groups.push(("boxShadow", box_shadow));
    groups.push(("backdropBlur", backdrop_blur));
    groups.push(("keyframes", keyframes(theme)));
    groups.push(("animation", animations(theme)));

    groups
        .into_iter()
        .filter(|(_, group)| !group.is_empty())
        .map(|(name, group)| (name.to_string(), Value::Object(group)))
        .collect()
}

fn global_groups(theme: &ResolvedTheme) -> Vec<(&'static str, Map<String, Value>)> {
    let mut font_family = Map::new();
    let mut font_weight = Map::new();
    let mut font_size = Map::new();
    let mut line_height = Map::new();
    let mut radius = Map::new();
    let mut spacing = Map::new();

    for (key, variable) in theme.global.iter() {
        match classify_global(key, variable.stage) {
            GlobalKind::FontFamily(name) => {
                font_family.insert(name.into(), var(key));
            }
            GlobalKind::FontWeight(name) => {
                font_weight.insert(name.into(), var(key));
            }
            GlobalKind::FontSize(name) => {
                font_size.insert(name.into(), var(key));
            }
            GlobalKind::LineHeight(name) => {
                line_height.insert(name.into(), var(key));
            }
            GlobalKind::Radius("base") => {
                radius.insert("lg".into(), var(key));
                radius.insert("md".into(), Value::String(format!("calc(var(--{key}) - 2px)")));
                radius.insert("sm".into(), Value::String(format!("calc(var(--{key}) - 4px)")));
            }
            GlobalKind::Radius(name) => {
                radius.insert(name.into(), var(key));
            }
            GlobalKind::Spacing(name) => {
                spacing.insert(name.into(), var(key));
            }
            GlobalKind::Animation(_) | GlobalKind::Other => {}
        }
    }

    vec![
        ("fontFamily", font_family),
        ("fontWeight", font_weight),
        ("fontSize", font_size),
        ("lineHeight", line_height),
        ("borderRadius", radius),
        ("spacing", spacing),
    ]
}

fn keyframes(theme: &ResolvedTheme) -> Map<String, Value> {
    theme
        .animations
        .iter()
        .filter(|spec| !spec.keyframes.is_empty())
        .map(|spec| {
            let stages = spec
                .keyframes
                .iter()
                .map(|stage| {
                    let props = stage
                        .properties
                        .iter()
                        .map(|(prop, value)| (prop.clone(), Value::String(value.clone())))
                        .collect();
                    (stage.selector.clone(), Value::Object(props))
                })
                .collect();
            (spec.name.clone(), Value::Object(stages))
        })
        .collect()
}

fn animations(theme: &ResolvedTheme) -> Map<String, Value> {
    theme
        .animations
        .iter()
        .map(|spec| (spec.name.clone(), Value::String(spec.shorthand())))
        .collect()
}

/// Inserts `group.key = value`. A plain color already sitting at `group`
/// is kept as the group's `DEFAULT`.
fn group_insert(colors: &mut Map<String, Value>, group: &str, key: &str, value: Value) {
    let slot = colors
        .entry(group.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        let mut map = Map::new();
        map.insert("DEFAULT".into(), slot.take());
        *slot = Value::Object(map);
    }
    if let Value::Object(map) = slot {
        map.insert(key.to_string(), value);
    }
}

/// Sets `colors.key`, or `colors.key.DEFAULT` if `key` is already a group.
fn set_leaf(colors: &mut Map<String, Value>, key: &str, value: Value) {
    match colors.get_mut(key) {
        Some(Value::Object(map)) => {
            map.insert("DEFAULT".into(), value);
        }
        _ => {
            colors.insert(key.to_string(), value);
        }
    }
}

// ─── JS literal writer ──────────────────────────────────────────────────────

fn write_js(value: &Value, indent: usize, out: &mut String) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (key, item) in map {
                push_indent(out, indent + 1);
                write_key(key, out);
                out.push_str(": ");
                write_js(item, indent + 1, out);
                out.push_str(",\n");
            }
            push_indent(out, indent);
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_js(item, indent, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Null => out.push_str("null"),
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Identifiers and plain numbers stay bare, everything else is quoted.
fn write_key(key: &str, out: &mut String) {
    let is_ident = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    let is_index = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if is_ident || is_index {
        out.push_str(key);
    } else {
        write_string(key, out);
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
}
