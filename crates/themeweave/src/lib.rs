//! Themeweave - theme normalization and multi-format design token generation.
//!
//! A theme document describes colors, typography, effects and animations,
//! possibly with internal `{"$ref": "dot.path"}` pointers. Themeweave
//! resolves it into flat per-mode variable maps and renders those into:
//!
//! - CSS custom properties
//! - SCSS variables
//! - a Tailwind config (TypeScript or JavaScript)
//! - a Figma Tokens (Tokens Studio) document
//! - a Style Dictionary token document
//!
//! # Quick Start
//!
//! ```rust
//! use themeweave::{FormatRegistry, GenerateOptions, ThemeDocument};
//!
//! let doc = ThemeDocument::from_yaml(r##"
//! id: ocean
//! name: Ocean
//! category: cool
//! version: "2"
//! scales:
//!   teal:
//!     steps:
//!       light: { 1: "#f0fdfa", 9: "#0d9488" }
//!       dark: { 1: "#042f2e", 9: "#2dd4bf" }
//! semanticTokens:
//!   light: { primary: { $ref: scales.teal.steps.light.9 } }
//!   dark: { primary: { $ref: scales.teal.steps.dark.9 } }
//! "##).unwrap();
//!
//! let registry = FormatRegistry::default();
//! let css = registry.generate(&doc, "css", &GenerateOptions::default()).unwrap();
//! assert!(css.content.contains("--primary: #0d9488;"));
//! assert!(css.content.contains("--teal-9: #2dd4bf;"));
//! ```
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | pointer resolution, with depth and cycle guards | [`reference`] |
//! | legacy (v1) to canonical (v2) upgrade | [`migrate`](mod@migrate) |
//! | scale expansion | [`scale`] |
//! | effects and animations | [`effects`] |
//! | stage orchestration | [`processor`] |
//! | rendering | [`emit`], dispatched by [`FormatRegistry`] |
//!
//! Generation never rejects a document: unresolvable pointers keep their
//! literal and are logged through `tracing`. Use [`validate()`] to find
//! problems.

pub mod colorspace;
pub mod document;
pub mod effects;
pub mod emit;
pub mod error;
pub mod migrate;
pub mod options;
pub mod processor;
pub mod reference;
pub mod registry;
pub mod scale;
pub mod validate;
pub mod variables;

pub use colorspace::{ColorConverter, CssColorConverter};
pub use document::{Mode, ModeSelection, SchemaVersion, ThemeDocument};
pub use error::{EmitError, GenerateError, LoadError, ReferenceError};
pub use migrate::migrate;
pub use options::{
    CssOptions, FigmaOptions, GenerateOptions, Organization, ScssOptions, StyleDictionaryOptions,
    TailwindOptions, TailwindVariant,
};
pub use processor::{process_theme, ProcessOptions, ProcessedTheme};
pub use registry::{FormatRegistry, FormatResult, Generated, GeneratorDescriptor};
pub use validate::{validate, ValidationReport};
pub use variables::{
    AnimationSpec, EffectSlot, GradientPart, KeyframeStage, ResolvedTheme, Stage, Variable,
    VariableMap,
};
