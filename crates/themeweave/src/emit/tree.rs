//! Token tree shared by the token-document emitters.
//!
//! A [`TokenTree`] is an ordered map of groups and [`Token`] leaves. It
//! serializes directly to the nested JSON both design-token formats use:
//!
//! ```json
//! { "teal": { "9": { "value": "#0d9488", "type": "color" } } }
//! ```
//!
//! A name may be both a token and a group, e.g. a semantic `accent` next to
//! the `accent` scale. The token then sits under `DEFAULT` inside the group.
//!
//! The helpers at the bottom decide where a variable lands in the tree
//! ([`mode_token_path`], [`global_token_path`]) and which [`TokenType`] it
//! carries.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::EmitError;
use crate::variables::{EffectSlot, GradientPart, ResolvedTheme, Stage, Variable};

use super::{classify_global, GlobalKind};

/// Key a token takes inside a group that shares its name.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// Type discriminator written on every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    Duration,
    CubicBezier,
    Shadow,
    FontWeight,
    LineHeight,
    FontSize,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: TokenType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Hex form of a color value, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenType) -> Self {
        Self {
            value: value.into(),
            kind,
            category: None,
            hex: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_hex(mut self, hex: Option<String>) -> Self {
        self.hex = hex;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenNode {
    Token(Token),
    Group(TokenTree),
}

/// Ordered, nested token groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenTree {
    nodes: IndexMap<String, TokenNode>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `token` at `path`, creating groups on the way.
    ///
    /// A name can hold a token and a group at once (`accent` next to
    /// `accent.9`): the token then lives in the group under [`DEFAULT_KEY`],
    /// whichever of the two arrives first. Only an empty path fails.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], token: Token) -> Result<(), EmitError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(EmitError::Invalid("empty token path".to_string()));
        };

        let mut tree = self;
        for segment in parents {
            let node = tree
                .nodes
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| TokenNode::Group(TokenTree::new()));
            if let TokenNode::Token(leaf) = node {
                debug!(segment = segment.as_ref(), "token moved under DEFAULT to make room for a group");
                let mut group = TokenTree::new();
                group.nodes.insert(DEFAULT_KEY.to_string(), TokenNode::Token(leaf.clone()));
                *node = TokenNode::Group(group);
            }
            let TokenNode::Group(group) = node else {
                return Err(EmitError::Invalid(format!(
                    "token path segment '{}' is not a group",
                    segment.as_ref()
                )));
            };
            tree = group;
        }
        match tree.nodes.get_mut(last.as_ref()) {
            Some(TokenNode::Group(group)) => group.insert(&[DEFAULT_KEY], token),
            _ => {
                tree.nodes.insert(last.as_ref().to_string(), TokenNode::Token(token));
                Ok(())
            }
        }
    }

    /// Inserts at `prefix` followed by `path`.
    pub fn insert_under(&mut self, prefix: &[&str], path: &[String], token: Token) -> Result<(), EmitError> {
        let full: Vec<&str> = prefix
            .iter()
            .copied()
            .chain(path.iter().map(String::as_str))
            .collect();
        self.insert(full.as_slice(), token)
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&TokenNode> {
        let (first, rest) = path.split_first()?;
        let node = self.nodes.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            TokenNode::Group(group) => group.get(rest),
            TokenNode::Token(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Pretty JSON with a trailing newline.
pub fn render_document(document: &impl Serialize) -> Result<String, EmitError> {
    let mut out = serde_json::to_string_pretty(document)?;
    out.push('\n');
    Ok(out)
}

/// Nested location of a per-mode variable.
///
/// | Variable | Path |
/// |----------|------|
/// | `teal-9`, `teal-a3` | `teal.9`, `teal.a3` |
/// | `chart-1` | `chart.1` |
/// | `sidebar-border` | `sidebar.border` |
/// | `glass-blur` | `glass.blur` |
/// | `glow`, `glow-large` | `glow.default`, `glow.large` |
/// | `gradient-brand-from` | `gradient.brand.from` |
/// | `gradient-brand` | `gradient.brand.css` |
/// | anything else | the name itself |
///
/// Effects are placed by their [`EffectSlot`], never by parsing the name.
pub fn mode_token_path(theme: &ResolvedTheme, key: &str, variable: &Variable) -> Vec<String> {
    if let Some(slot) = &variable.slot {
        return match slot {
            EffectSlot::Glass { part } => vec!["glass".to_string(), part.clone()],
            EffectSlot::Glow { variant } => vec!["glow".to_string(), variant.clone()],
            EffectSlot::Gradient { name, part } => {
                vec!["gradient".to_string(), name.clone(), part.as_str().to_string()]
            }
        };
    }
    let parts: Vec<&str> = match variable.stage {
        Stage::Scale => match theme.split_scale_key(key) {
            Some((scale, step)) => vec![scale, step],
            None => vec![key],
        },
        Stage::Chart => vec!["chart", key.strip_prefix("chart-").unwrap_or(key)],
        Stage::Sidebar => vec!["sidebar", key.strip_prefix("sidebar-").unwrap_or(key)],
        _ => vec![key],
    };
    parts.into_iter().map(str::to_string).collect()
}

/// Group and name of a global variable, e.g. `font-weight-bold` →
/// `fontWeight.bold`.
pub fn global_token_path(key: &str, stage: Stage) -> Vec<String> {
    let parts: Vec<&str> = match classify_global(key, stage) {
        GlobalKind::FontFamily(name) => vec!["fontFamily", name],
        GlobalKind::FontWeight(name) => vec!["fontWeight", name],
        GlobalKind::FontSize(name) => vec!["fontSize", name],
        GlobalKind::LineHeight(name) => vec!["lineHeight", name],
        GlobalKind::Radius(name) => vec!["borderRadius", name],
        GlobalKind::Spacing(name) => vec!["spacing", name],
        GlobalKind::Animation(name) => vec!["animation", name, "shorthand"],
        GlobalKind::Other => vec![key],
    };
    parts.into_iter().map(str::to_string).collect()
}

/// Type of a variable, from its stage and slot (for effects) or its name
/// (for globals).
pub fn token_type(key: &str, variable: &Variable) -> TokenType {
    let stage = variable.stage;
    if stage.is_color() {
        return TokenType::Color;
    }
    match stage {
        Stage::Effect => match &variable.slot {
            Some(EffectSlot::Glow { variant }) if variant != "color" => TokenType::Shadow,
            Some(EffectSlot::Glass { part }) if part == "blur" => TokenType::Dimension,
            Some(EffectSlot::Gradient {
                part: GradientPart::Css | GradientPart::Direction,
                ..
            }) => TokenType::Other,
            Some(_) => TokenType::Color,
            None => TokenType::Other,
        },
        Stage::Typography | Stage::Spacing => match classify_global(key, stage) {
            GlobalKind::FontFamily(_) => TokenType::FontFamily,
            GlobalKind::FontWeight(_) => TokenType::FontWeight,
            GlobalKind::FontSize(_) => TokenType::FontSize,
            GlobalKind::LineHeight(_) => TokenType::LineHeight,
            GlobalKind::Radius(_) | GlobalKind::Spacing(_) => TokenType::Dimension,
            _ => TokenType::Other,
        },
        _ => TokenType::Other,
    }
}
