//! Style Dictionary token document.
//!
//! | Group | Contents |
//! |-------|----------|
//! | `color.{mode}` | scale, semantic, status, chart and sidebar colors |
//! | `font.{family,weight,size,lineHeight}` | typography |
//! | `spacing`, `radius` | spacing scale and radii |
//! | `effect.{mode}` | glass, glow and gradient values |
//! | `animation.{name}` | shorthand, duration and easing |
//!
//! Every leaf carries `value`, `type` and `category`. Colors are nested
//! (`color.light.teal.9`) or flat (`color.light.teal-9`) depending on
//! [`Organization`]; an optional `$metadata` block describes the theme.

use serde::Serialize;

use crate::document::Mode;
use crate::error::EmitError;
use crate::options::Organization;
use crate::variables::{ResolvedTheme, Stage};

use super::tree::{mode_token_path, render_document, token_type, Token, TokenTree, TokenType};
use super::{classify_global, EmitContext, GlobalKind, GENERATOR};

#[derive(Serialize)]
struct StyleDictionaryDocument {
    #[serde(rename = "$metadata", skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    #[serde(flatten)]
    tokens: TokenTree,
}

#[derive(Serialize)]
struct Metadata {
    name: String,
    id: String,
    version: &'static str,
    generator: &'static str,
    modes: Vec<Mode>,
}

pub fn emit(ctx: &EmitContext<'_>) -> Result<String, EmitError> {
    let theme = ctx.theme;
    let options = &ctx.options.style_dictionary;
    let mut tokens = TokenTree::new();

    for &mode in theme.modes.modes() {
        for (key, variable) in theme.mode(mode).iter() {
            let kind = token_type(key, variable);
            if variable.stage == Stage::Effect {
                let token = Token::new(&variable.value, kind).with_category("effect");
                let path = mode_token_path(theme, key, variable);
                tokens.insert_under(&["effect", mode.as_str()], &path, token)?;
                continue;
            }
            let token = Token::new(&variable.value, kind).with_category("color");
            match options.organization {
                Organization::Nested => {
                    let path = mode_token_path(theme, key, variable);
                    tokens.insert_under(&["color", mode.as_str()], &path, token)?;
                }
                Organization::Flat => tokens.insert(&["color", mode.as_str(), key], token)?,
            }
        }
    }

    for (key, variable) in theme.global.iter() {
        let kind = token_type(key, variable);
        let path: Vec<&str> = match classify_global(key, variable.stage) {
            GlobalKind::FontFamily(name) => vec!["font", "family", name],
            GlobalKind::FontWeight(name) => vec!["font", "weight", name],
            GlobalKind::FontSize(name) => vec!["font", "size", name],
            GlobalKind::LineHeight(name) => vec!["font", "lineHeight", name],
            GlobalKind::Spacing(name) => vec!["spacing", name],
            GlobalKind::Radius(name) => vec!["radius", name],
            GlobalKind::Animation(name) => vec!["animation", name, "shorthand"],
            GlobalKind::Other => vec!["other", key],
        };
        let token = Token::new(&variable.value, kind).with_category(path[0]);
        tokens.insert(path.as_slice(), token)?;
    }

    for spec in &theme.animations {
        let name = spec.name.as_str();
        tokens.insert(
            &["animation", name, "duration"],
            Token::new(&spec.duration, TokenType::Duration).with_category("animation"),
        )?;
        tokens.insert(
            &["animation", name, "easing"],
            Token::new(&spec.easing, TokenType::CubicBezier).with_category("animation"),
        )?;
    }

    let document = StyleDictionaryDocument {
        metadata: options.include_metadata.then(|| metadata(theme)),
        tokens,
    };
    render_document(&document)
}

fn metadata(theme: &ResolvedTheme) -> Metadata {
    Metadata {
        name: theme.name.clone(),
        id: theme.id.clone(),
        version: theme.version.as_str(),
        generator: GENERATOR,
        modes: theme.modes.modes().to_vec(),
    }
}
