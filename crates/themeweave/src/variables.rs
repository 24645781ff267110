//! The resolved variable model every emitter consumes.
//!
//! A [`VariableMap`] is a flat, insertion-ordered mapping from variable name
//! to literal value. Each entry remembers the [`Stage`] that produced it, so
//! emitters can group entries by provenance instead of guessing from the
//! shape of the name.
//!
//! Inserting an existing name replaces its value (the later stage wins) but
//! keeps its original position.

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::{Mode, ModeSelection, SchemaVersion};

/// Processing stage that produced a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Scale,
    Semantic,
    Status,
    Chart,
    Sidebar,
    Effect,
    Animation,
    Typography,
    Spacing,
    Legacy,
}

impl Stage {
    /// True for stages whose values are colors.
    pub fn is_color(self) -> bool {
        matches!(
            self,
            Stage::Scale
                | Stage::Semantic
                | Stage::Status
                | Stage::Chart
                | Stage::Sidebar
                | Stage::Legacy
        )
    }
}

/// Part of a gradient an effect variable holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientPart {
    /// The composed `linear-gradient(...)` value.
    Css,
    From,
    To,
    Direction,
}

impl GradientPart {
    pub fn as_str(self) -> &'static str {
        match self {
            GradientPart::Css => "css",
            GradientPart::From => "from",
            GradientPart::To => "to",
            GradientPart::Direction => "direction",
        }
    }
}

/// Where an effect variable came from, recorded when it is produced.
///
/// Effect names are free-form (`gradient-fade-to` may be the gradient
/// `fade-to` or the `to` end of `fade`), so emitters group by this slot
/// rather than by the variable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "effect")]
pub enum EffectSlot {
    /// `background`, `blur` or `border`.
    Glass { part: String },
    /// `default`, `large` or `color`.
    Glow { variant: String },
    Gradient { name: String, part: GradientPart },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub value: String,
    pub stage: Stage,
    /// Set for [`Stage::Effect`] variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<EffectSlot>,
}

/// Flat, ordered variable name → value mapping for one mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    entries: IndexMap<String, Variable>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        stage: Stage,
    ) -> Option<Variable> {
        self.entries.insert(
            name.into(),
            Variable {
                value: value.into(),
                stage,
                slot: None,
            },
        )
    }

    /// Inserts an effect variable together with its slot.
    pub fn insert_effect(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        slot: EffectSlot,
    ) -> Option<Variable> {
        self.entries.insert(
            name.into(),
            Variable {
                value: value.into(),
                stage: Stage::Effect,
                slot: Some(slot),
            },
        )
    }

    /// Merges `other` into this map; entries of `other` win.
    pub fn merge(&mut self, other: VariableMap) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|v| v.value.as_str())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries produced by `stage`, in map order.
    pub fn by_stage(&self, stage: Stage) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(move |(_, v)| v.stage == stage)
            .map(|(k, v)| (k.as_str(), v.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain name → value view.
    pub fn to_values(&self) -> IndexMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }
}

/// One stage (`from`, `50%`, `to`, ...) of a keyframe block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyframeStage {
    pub selector: String,
    /// Hyphenated property name → value.
    pub properties: Vec<(String, String)>,
}

/// A named animation with its shorthand parts and keyframe stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationSpec {
    pub name: String,
    pub duration: String,
    pub easing: String,
    pub iteration: Option<String>,
    pub keyframes: Vec<KeyframeStage>,
}

impl AnimationSpec {
    /// `"{name} {duration} {easing}[ {iteration}]"`.
    pub fn shorthand(&self) -> String {
        let mut out = format!("{} {} {}", self.name, self.duration, self.easing);
        if let Some(iteration) = &self.iteration {
            out.push(' ');
            out.push_str(iteration);
        }
        out
    }
}

/// Everything a generation request resolves a theme into.
///
/// `global` holds mode-independent variables (typography, spacing,
/// animations); `light` and `dark` hold the per-mode maps. Modes that were
/// not requested stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub id: String,
    pub name: String,
    pub version: SchemaVersion,
    pub modes: ModeSelection,
    pub global: VariableMap,
    pub light: VariableMap,
    pub dark: VariableMap,
    /// Scale names in document order.
    pub scale_names: Vec<String>,
    pub animations: Vec<AnimationSpec>,
}

impl ResolvedTheme {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            modes: ModeSelection::default(),
            global: VariableMap::new(),
            light: VariableMap::new(),
            dark: VariableMap::new(),
            scale_names: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn mode(&self, mode: Mode) -> &VariableMap {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    pub fn mode_mut(&mut self, mode: Mode) -> &mut VariableMap {
        match mode {
            Mode::Light => &mut self.light,
            Mode::Dark => &mut self.dark,
        }
    }

    /// Splits a scale variable name into `(scale, step)`, e.g.
    /// `"blue-gray-a3"` → `("blue-gray", "a3")`.
    ///
    /// Only names of known scales match, so a semantic token that happens
    /// to look like `word-3` is never mistaken for a scale step.
    pub fn split_scale_key<'k>(&self, key: &'k str) -> Option<(&'k str, &'k str)> {
        self.scale_names.iter().find_map(|scale| {
            let step = key.strip_prefix(scale.as_str())?.strip_prefix('-')?;
            let digits = step.strip_prefix('a').unwrap_or(step);
            let n: usize = digits.parse().ok()?;
            (1..=crate::document::SCALE_STEPS)
                .contains(&n)
                .then(|| (&key[..scale.len()], step))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_insert_wins_and_keeps_position() {
        let mut map = VariableMap::new();
        map.insert("primary", "#111", Stage::Scale);
        map.insert("border", "#222", Stage::Semantic);
        let old = map.insert("primary", "#333", Stage::Semantic);

        assert_eq!(old.map(|v| v.value), Some("#111".to_string()));
        assert_eq!(map.get("primary"), Some("#333"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["primary", "border"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_insert_effect_records_slot() {
        let mut map = VariableMap::new();
        let slot = EffectSlot::Gradient {
            name: "fade-to".into(),
            part: GradientPart::Css,
        };
        map.insert_effect("gradient-fade-to", "linear-gradient(...)", slot.clone());
        let variable = map.variable("gradient-fade-to").unwrap();
        assert_eq!(variable.stage, Stage::Effect);
        assert_eq!(variable.slot, Some(slot));
    }

    #[test]
    fn test_by_stage_filters() {
        let mut map = VariableMap::new();
        map.insert("teal-1", "#1", Stage::Scale);
        map.insert("primary", "#2", Stage::Semantic);
        let scales: Vec<_> = map.by_stage(Stage::Scale).collect();
        assert_eq!(scales, vec![("teal-1", "#1")]);
    }

    #[test]
    fn test_shorthand_with_iteration() {
        let spec = AnimationSpec {
            name: "spin".into(),
            duration: "1s".into(),
            easing: "linear".into(),
            iteration: Some("infinite".into()),
            keyframes: vec![],
        };
        assert_eq!(spec.shorthand(), "spin 1s linear infinite");
    }

    #[test]
    fn test_split_scale_key_uses_known_scales() {
        let mut theme = ResolvedTheme::new("t", "T", SchemaVersion::Canonical);
        theme.scale_names = vec!["blue-gray".into(), "teal".into()];

        assert_eq!(theme.split_scale_key("blue-gray-a3"), Some(("blue-gray", "a3")));
        assert_eq!(theme.split_scale_key("teal-12"), Some(("teal", "12")));
        assert_eq!(theme.split_scale_key("teal-13"), None);
        assert_eq!(theme.split_scale_key("chart-1"), None);
    }
}
