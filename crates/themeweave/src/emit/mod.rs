//! Format emitters.
//!
//! Every emitter is a plain function from an [`EmitContext`] to the output
//! text. Emitters only see the resolved theme, never the source document.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`css`] | custom properties in a root and a dark block, plus `@keyframes` |
//! | [`scss`] | `$variables`, dark entries prefixed |
//! | [`tailwind`] | `tailwind.config.ts` / `.js` extending the theme with `var()` references |
//! | [`figma`] | Tokens Studio document with `global`, `light` and `dark` sets |
//! | [`style_dictionary`] | Style Dictionary token tree |
//!
//! The two token documents share [`tree::TokenTree`].

pub mod css;
pub mod figma;
pub mod scss;
pub mod style_dictionary;
pub mod tailwind;
pub mod tree;

use crate::colorspace::ColorConverter;
use crate::error::EmitError;
use crate::options::GenerateOptions;
use crate::variables::{ResolvedTheme, Stage};

/// Everything an emitter may read.
pub struct EmitContext<'a> {
    pub theme: &'a ResolvedTheme,
    pub options: &'a GenerateOptions,
    pub converter: &'a dyn ColorConverter,
}

/// Signature shared by all emitters.
pub type EmitFn = fn(&EmitContext<'_>) -> Result<String, EmitError>;

/// Tool name written into generated headers and metadata.
pub const GENERATOR: &str = "themeweave";

/// Strips characters that would break out of a declaration.
pub(crate) fn sanitize_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Replaces anything outside `[A-Za-z0-9_-]` with `-`.
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Keeps comment text from closing the comment early.
pub(crate) fn comment_text(text: &str) -> String {
    text.replace("*/", "* /").replace(['\n', '\r'], " ")
}

/// Kind of a mode-independent variable, with the name part after its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalKind<'a> {
    FontFamily(&'a str),
    FontWeight(&'a str),
    FontSize(&'a str),
    LineHeight(&'a str),
    /// `radius` itself is reported as `Radius("base")`.
    Radius(&'a str),
    Spacing(&'a str),
    Animation(&'a str),
    Other,
}

/// Classifies a global variable by its producing stage and prefix.
pub(crate) fn classify_global(key: &str, stage: Stage) -> GlobalKind<'_> {
    match stage {
        Stage::Typography => {
            if let Some(name) = key.strip_prefix("font-weight-") {
                GlobalKind::FontWeight(name)
            } else if let Some(name) = key.strip_prefix("font-size-") {
                GlobalKind::FontSize(name)
            } else if let Some(name) = key.strip_prefix("line-height-") {
                GlobalKind::LineHeight(name)
            } else if let Some(name) = key.strip_prefix("font-") {
                GlobalKind::FontFamily(name)
            } else {
                GlobalKind::Other
            }
        }
        Stage::Spacing => {
            if key == "radius" {
                GlobalKind::Radius("base")
            } else if let Some(name) = key.strip_prefix("radius-") {
                GlobalKind::Radius(name)
            } else if let Some(name) = key.strip_prefix("spacing-") {
                GlobalKind::Spacing(name)
            } else {
                GlobalKind::Other
            }
        }
        Stage::Animation => key
            .strip_prefix("animation-")
            .map_or(GlobalKind::Other, GlobalKind::Animation),
        _ => GlobalKind::Other,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("#fff; } body { color: red"), "#fff  body  color: red");
        assert_eq!(sanitize_value(" 0 0 8px\n#000 "), "0 0 8px#000");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("teal-a1"), "teal-a1");
        assert_eq!(sanitize_name("a b:c"), "a-b-c");
    }

    #[test]
    fn test_classify_global() {
        assert_eq!(
            classify_global("font-weight-bold", Stage::Typography),
            GlobalKind::FontWeight("bold")
        );
        assert_eq!(classify_global("font-sans", Stage::Typography), GlobalKind::FontFamily("sans"));
        assert_eq!(
            classify_global("line-height-tight", Stage::Typography),
            GlobalKind::LineHeight("tight")
        );
        assert_eq!(classify_global("radius", Stage::Spacing), GlobalKind::Radius("base"));
        assert_eq!(classify_global("radius-lg", Stage::Spacing), GlobalKind::Radius("lg"));
        assert_eq!(classify_global("spacing-4", Stage::Spacing), GlobalKind::Spacing("4"));
        assert_eq!(
            classify_global("animation-spin", Stage::Animation),
            GlobalKind::Animation("spin")
        );
        // Provenance decides, not the name.
        assert_eq!(classify_global("font-sans", Stage::Semantic), GlobalKind::Other);
    }
}
