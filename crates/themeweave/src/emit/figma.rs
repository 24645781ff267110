//! Figma Tokens (Tokens Studio) document.
//!
//! One token set per group: `global` for mode-independent tokens, plus
//! `light` and `dark` for the requested modes. `$themes` lists one theme per
//! mode, each enabling its mode set on top of `global`:
//!
//! ```json
//! {
//!   "global": { "fontFamily": { "sans": { "value": "Inter", "type": "fontFamily" } } },
//!   "light": { "teal": { "9": { "value": "oklch(0.6 0.1 180)", "type": "color", "hex": "#..." } } },
//!   "$themes": [{ "id": "ocean-light", "name": "Ocean Light",
//!                 "selectedTokenSets": { "global": "source", "light": "enabled" } }],
//!   "$metadata": { "tokenSetOrder": ["global", "light"] }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::Mode;
use crate::error::EmitError;
use crate::variables::ResolvedTheme;

use super::tree::{global_token_path, mode_token_path, render_document, token_type, Token, TokenTree, TokenType};
use super::EmitContext;

const GLOBAL_SET: &str = "global";

#[derive(Serialize)]
struct FigmaDocument {
    #[serde(flatten)]
    sets: IndexMap<String, TokenTree>,
    #[serde(rename = "$themes")]
    themes: Vec<FigmaTheme>,
    #[serde(rename = "$metadata")]
    metadata: FigmaMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FigmaTheme {
    id: String,
    name: String,
    selected_token_sets: IndexMap<String, &'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FigmaMetadata {
    token_set_order: Vec<String>,
}

pub fn emit(ctx: &EmitContext<'_>) -> Result<String, EmitError> {
    let theme = ctx.theme;
    let mut sets = IndexMap::new();
    sets.insert(GLOBAL_SET.to_string(), global_set(theme)?);

    let mut themes = Vec::new();
    for &mode in theme.modes.modes() {
        sets.insert(mode.as_str().to_string(), mode_set(ctx, mode)?);

        let mut selected = IndexMap::new();
        selected.insert(GLOBAL_SET.to_string(), "source");
        selected.insert(mode.as_str().to_string(), "enabled");
        themes.push(FigmaTheme {
            id: format!("{}-{}", theme.id, mode),
            name: format!("{} {}", theme.name, title_case(mode.as_str())),
            selected_token_sets: selected,
        });
    }

    let document = FigmaDocument {
        metadata: FigmaMetadata {
            token_set_order: sets.keys().cloned().collect(),
        },
        sets,
        themes,
    };
    render_document(&document)
}

fn global_set(theme: &ResolvedTheme) -> Result<TokenTree, EmitError> {
    let mut tree = TokenTree::new();
    for (key, variable) in theme.global.iter() {
        let path = global_token_path(key, variable.stage);
        let token = Token::new(&variable.value, token_type(key, variable));
        tree.insert(path.as_slice(), token)?;
    }
    for spec in &theme.animations {
        tree.insert(
            &["animation", spec.name.as_str(), "duration"],
            Token::new(&spec.duration, TokenType::Duration),
        )?;
        tree.insert(
            &["animation", spec.name.as_str(), "easing"],
            Token::new(&spec.easing, TokenType::CubicBezier),
        )?;
    }
    Ok(tree)
}

fn mode_set(ctx: &EmitContext<'_>, mode: Mode) -> Result<TokenTree, EmitError> {
    let theme = ctx.theme;
    let include_hex = ctx.options.figma.include_hex;
    let mut tree = TokenTree::new();

    for (key, variable) in theme.mode(mode).iter() {
        let kind = token_type(key, variable);
        let hex = if include_hex && kind == TokenType::Color {
            ctx.converter.to_hex(&variable.value)
        } else {
            None
        };
        let token = Token::new(&variable.value, kind).with_hex(hex);
        let path = mode_token_path(theme, key, variable);
        tree.insert(path.as_slice(), token)?;
    }
    Ok(tree)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
