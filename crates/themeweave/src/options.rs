//! Generation options.
//!
//! [`GenerateOptions`] bundles the processing switches with one options
//! block per format. Every field has a default, so an options file only
//! needs the keys it changes:
//!
//! ```yaml
//! mode: dark
//! css:
//!   dark_selector: "[data-theme=dark]"
//! tailwind:
//!   variant: javascript
//! style_dictionary:
//!   organization: flat
//! ```

use serde::{Deserialize, Serialize};

use crate::document::ModeSelection;
use crate::error::LoadError;
use crate::processor::ProcessOptions;

/// Options for a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Run the canonical pipeline even for legacy documents.
    pub force_v2: bool,
    pub mode: ModeSelection,
    pub css: CssOptions,
    pub scss: ScssOptions,
    pub tailwind: TailwindOptions,
    pub figma: FigmaOptions,
    pub style_dictionary: StyleDictionaryOptions,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_force_v2(mut self, force_v2: bool) -> Self {
        self.force_v2 = force_v2;
        self
    }

    pub fn with_mode(mut self, mode: ModeSelection) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_css(mut self, css: CssOptions) -> Self {
        self.css = css;
        self
    }

    pub fn with_scss(mut self, scss: ScssOptions) -> Self {
        self.scss = scss;
        self
    }

    pub fn with_tailwind(mut self, tailwind: TailwindOptions) -> Self {
        self.tailwind = tailwind;
        self
    }

    pub fn with_figma(mut self, figma: FigmaOptions) -> Self {
        self.figma = figma;
        self
    }

    pub fn with_style_dictionary(mut self, style_dictionary: StyleDictionaryOptions) -> Self {
        self.style_dictionary = style_dictionary;
        self
    }

    /// The subset of options the processor reads.
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            force_v2: self.force_v2,
            mode: self.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssOptions {
    /// Selector of the block holding global and light variables.
    pub root_selector: String,
    /// Selector of the block holding dark variables.
    pub dark_selector: String,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            root_selector: ":root".to_string(),
            dark_selector: ".dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScssOptions {
    /// Prefix for dark-mode variable names (`$dark-primary`).
    pub dark_prefix: String,
}

impl Default for ScssOptions {
    fn default() -> Self {
        Self {
            dark_prefix: "dark-".to_string(),
        }
    }
}

/// Syntax of the generated Tailwind config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailwindVariant {
    /// `tailwind.config.ts` with a typed `Config` export.
    #[default]
    TypeScript,
    /// `tailwind.config.js` with `module.exports`.
    JavaScript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailwindOptions {
    pub variant: TailwindVariant,
    /// Value of the config's `darkMode` key.
    pub dark_mode: String,
}

impl Default for TailwindOptions {
    fn default() -> Self {
        Self {
            variant: TailwindVariant::default(),
            dark_mode: "class".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaOptions {
    /// Add a `hex` field to color tokens the converter understands.
    pub include_hex: bool,
}

impl Default for FigmaOptions {
    fn default() -> Self {
        Self { include_hex: true }
    }
}

/// How Style Dictionary color tokens are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organization {
    /// `color.light.teal.9`
    #[default]
    Nested,
    /// `color.light.teal-9`
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDictionaryOptions {
    pub organization: Organization,
    pub include_metadata: bool,
}

impl Default for StyleDictionaryOptions {
    fn default() -> Self {
        Self {
            organization: Organization::default(),
            include_metadata: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GenerateOptions::default();
        assert!(!opts.force_v2);
        assert_eq!(opts.mode, ModeSelection::Both);
        assert_eq!(opts.css.root_selector, ":root");
        assert_eq!(opts.css.dark_selector, ".dark");
        assert_eq!(opts.scss.dark_prefix, "dark-");
        assert_eq!(opts.tailwind.variant, TailwindVariant::TypeScript);
        assert_eq!(opts.tailwind.dark_mode, "class");
        assert!(opts.figma.include_hex);
        assert_eq!(opts.style_dictionary.organization, Organization::Nested);
        assert!(opts.style_dictionary.include_metadata);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
mode: dark
css:
  dark_selector: "[data-theme=dark]"
tailwind:
  variant: javascript
style_dictionary:
  organization: flat
"#;
        let opts = GenerateOptions::from_yaml(yaml).unwrap();
        assert_eq!(opts.mode, ModeSelection::Dark);
        assert_eq!(opts.css.dark_selector, "[data-theme=dark]");
        assert_eq!(opts.css.root_selector, ":root");
        assert_eq!(opts.tailwind.variant, TailwindVariant::JavaScript);
        assert_eq!(opts.tailwind.dark_mode, "class");
        assert_eq!(opts.style_dictionary.organization, Organization::Flat);
        assert!(opts.style_dictionary.include_metadata);
    }

    #[test]
    fn test_json_and_errors() {
        let opts = GenerateOptions::from_json(r#"{"force_v2": true, "figma": {"include_hex": false}}"#)
            .unwrap();
        assert!(opts.force_v2);
        assert!(!opts.figma.include_hex);

        assert!(matches!(
            GenerateOptions::from_json("{\"mode\": \"sepia\"}"),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            GenerateOptions::from_yaml("mode: [1, 2"),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_builders_and_process_options() {
        let opts = GenerateOptions::new()
            .with_force_v2(true)
            .with_mode(ModeSelection::Light)
            .with_tailwind(TailwindOptions {
                variant: TailwindVariant::JavaScript,
                ..Default::default()
            });
        assert_eq!(opts.tailwind.variant, TailwindVariant::JavaScript);
        assert_eq!(
            opts.process_options(),
            ProcessOptions {
                force_v2: true,
                mode: ModeSelection::Light,
            }
        );
    }
}
