//! CSS custom properties.
//!
//! ```css
//! :root {
//!   --font-sans: Inter, sans-serif;
//!   --primary: #0d9488;
//! }
//!
//! .dark {
//!   --primary: #2dd4bf;
//! }
//!
//! @keyframes fadeIn { ... }
//! ```
//!
//! The root block holds global variables followed by the light map; the dark
//! block holds the dark map. Empty blocks are left out.

use std::fmt::Write as _;

use crate::error::EmitError;
use crate::options::CssOptions;
use crate::variables::{AnimationSpec, ResolvedTheme, VariableMap};

use super::{comment_text, sanitize_name, sanitize_value, EmitContext, GENERATOR};

pub fn emit(ctx: &EmitContext<'_>) -> Result<String, EmitError> {
    Ok(render(ctx.theme, &ctx.options.css))
}

/// Renders the stylesheet. Also used as the processor's default output.
pub fn render(theme: &ResolvedTheme, options: &CssOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "/* {} ({}) */\n/* Generated by {GENERATOR}. Do not edit. */",
        comment_text(&theme.name),
        comment_text(&theme.id)
    );

    write_block(
        &mut out,
        &options.root_selector,
        declarations(&theme.global).chain(declarations(&theme.light)),
    );
    write_block(&mut out, &options.dark_selector, declarations(&theme.dark));

    for spec in &theme.animations {
        out.push('\n');
        out.push_str(&keyframes_block(spec));
    }
    out
}

fn declarations(map: &VariableMap) -> impl Iterator<Item = (&str, &str)> {
    map.iter().map(|(k, v)| (k, v.value.as_str()))
}

fn write_block<'a>(out: &mut String, selector: &str, entries: impl Iterator<Item = (&'a str, &'a str)>) {
    let mut body = String::new();
    for (name, value) in entries {
        let _ = writeln!(body, "  --{}: {};", sanitize_name(name), sanitize_value(value));
    }
    if body.is_empty() {
        return;
    }
    let _ = write!(out, "\n{} {{\n{body}}}\n", sanitize_value(selector));
}

/// One `@keyframes` rule. Shared with the SCSS emitter.
pub(crate) fn keyframes_block(spec: &AnimationSpec) -> String {
    let mut out = format!("@keyframes {} {{\n", sanitize_name(&spec.name));
    for stage in &spec.keyframes {
        let _ = writeln!(out, "  {} {{", sanitize_value(&stage.selector));
        for (prop, value) in &stage.properties {
            let _ = writeln!(out, "    {}: {};", sanitize_name(prop), sanitize_value(value));
        }
        out.push_str("  }\n");
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::test_support::sample_theme;
    use crate::variables::{KeyframeStage, Stage};

    #[test]
    fn test_root_and_dark_blocks() {
        let css = render(&sample_theme(), &CssOptions::default());

        assert!(css.starts_with("/* Ocean (ocean) */"));
        let root = css.find(":root {").unwrap();
        let dark = css.find(".dark {").unwrap();
        assert!(root < dark);

        let root_block = &css[root..dark];
        assert!(root_block.contains("  --font-sans: Inter, sans-serif;\n"));
        assert!(root_block.contains("  --teal-9: #0d9488;\n"));
        assert!(root_block.contains("  --primary: #0d9488;\n"));
        assert!(root_block.contains("  --gradient-brand: linear-gradient(to right, #f0fdfa, #0d9488);\n"));

        let dark_block = &css[dark..];
        assert!(dark_block.contains("  --primary: #2dd4bf;\n"));
        assert!(!dark_block.contains("--font-sans"));
    }

    #[test]
    fn test_global_precedes_light() {
        let css = render(&sample_theme(), &CssOptions::default());
        assert!(css.find("--radius:").unwrap() < css.find("--teal-1:").unwrap());
    }

    #[test]
    fn test_keyframes() {
        let css = render(&sample_theme(), &CssOptions::default());
        assert!(css.contains("@keyframes fadeIn {\n  from {\n    opacity: 0;\n  }\n  to {\n    opacity: 1;\n  }\n}\n"));
    }

    #[test]
    fn test_custom_selectors() {
        let options = CssOptions {
            root_selector: ":host".into(),
            dark_selector: "[data-theme=\"dark\"]".into(),
        };
        let css = render(&sample_theme(), &options);
        assert!(css.contains(":host {"));
        assert!(css.contains("[data-theme=\"dark\"] {"));
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let mut theme = ResolvedTheme::new("bare", "Bare", crate::document::SchemaVersion::Canonical);
        theme.light.insert("primary", "#000", Stage::Semantic);
        let css = render(&theme, &CssOptions::default());
        assert!(css.contains(":root {"));
        assert!(!css.contains(".dark"));
    }

    #[test]
    fn test_values_cannot_escape_declaration() {
        let mut theme = ResolvedTheme::new("x", "X", crate::document::SchemaVersion::Canonical);
        theme.light.insert("evil", "red; } body { display: none", Stage::Semantic);
        theme.animations.push(AnimationSpec {
            name: "a{b".into(),
            duration: "1s".into(),
            easing: "linear".into(),
            iteration: None,
            keyframes: vec![KeyframeStage {
                selector: "50%".into(),
                properties: vec![("opacity".into(), "0}".into())],
            }],
        });
        let css = render(&theme, &CssOptions::default());
        assert!(css.contains("  --evil: red  body  display: none;\n"));
        assert!(css.contains("@keyframes a-b {"));
        assert!(css.contains("    opacity: 0;\n"));
    }
}
