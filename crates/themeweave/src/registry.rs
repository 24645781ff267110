//! Format registry.
//!
//! [`FormatRegistry`] maps a format identifier to a [`GeneratorDescriptor`].
//! It is an ordinary value: build one with [`FormatRegistry::with_defaults`]
//! (or [`Default`]), add more formats with [`FormatRegistry::register`], and
//! pass it where it is needed.
//!
//! # Built-in formats
//!
//! | Id | Extension | Content type |
//! |----|-----------|--------------|
//! | `css` | `css` | `text/css` |
//! | `scss` | `scss` | `text/x-scss` |
//! | `tailwind` | `ts` (`js` for the JavaScript variant) | `application/typescript` |
//! | `figma` | `json` | `application/json` |
//! | `style-dictionary` | `json` | `application/json` |
//!
//! # Failure isolation
//!
//! [`FormatRegistry::generate_all`] always returns one [`FormatResult`] per
//! registered format. Emitter errors and panics are captured in the failing
//! format's slot; a panic while processing the theme fails every slot.
//!
//! # Example
//!
//! ```rust
//! use themeweave::{FormatRegistry, GenerateOptions, ThemeDocument};
//!
//! let doc = ThemeDocument::from_json(r##"{"id": "mini", "semanticTokens": {"light": {"primary": "#000"}}}"##).unwrap();
//! let registry = FormatRegistry::default();
//!
//! let css = registry.generate(&doc, "css", &GenerateOptions::default()).unwrap();
//! assert!(css.content.contains("--primary: #000;"));
//!
//! let all = registry.generate_all(&doc, &GenerateOptions::default());
//! assert_eq!(all.len(), 5);
//! ```

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::colorspace::{ColorConverter, CssColorConverter};
use crate::document::ThemeDocument;
use crate::emit::{css, figma, scss, style_dictionary, tailwind, EmitContext, EmitFn};
use crate::error::GenerateError;
use crate::options::{GenerateOptions, TailwindVariant};
use crate::processor::process_theme;
use crate::variables::ResolvedTheme;

/// Output extension and content type chosen from the options.
pub type OutputOverride = fn(&GenerateOptions) -> Option<(&'static str, &'static str)>;

/// A registered output format.
#[derive(Debug, Clone)]
pub struct GeneratorDescriptor {
    pub id: String,
    /// Display name.
    pub name: String,
    pub description: String,
    /// File extension, without the dot.
    pub ext: String,
    pub content_type: String,
    pub emitter: EmitFn,
    pub output_override: Option<OutputOverride>,
}

impl GeneratorDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        ext: impl Into<String>,
        content_type: impl Into<String>,
        emitter: EmitFn,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            ext: ext.into(),
            content_type: content_type.into(),
            emitter,
            output_override: None,
        }
    }

    pub fn with_output_override(mut self, output_override: OutputOverride) -> Self {
        self.output_override = Some(output_override);
        self
    }

    /// Extension and content type for a request with `options`.
    pub fn output(&self, options: &GenerateOptions) -> (String, String) {
        match self.output_override.and_then(|f| f(options)) {
            Some((ext, content_type)) => (ext.to_string(), content_type.to_string()),
            None => (self.ext.clone(), self.content_type.clone()),
        }
    }
}

/// Output of a successful single-format generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub format: String,
    pub content: String,
    pub ext: String,
    pub content_type: String,
}

/// One slot of a [`FormatRegistry::generate_all`] result.
#[derive(Debug)]
pub struct FormatResult {
    pub format: String,
    pub ext: String,
    pub content_type: String,
    pub outcome: Result<String, GenerateError>,
}

impl FormatResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn content(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&GenerateError> {
        self.outcome.as_ref().err()
    }
}

pub struct FormatRegistry {
    formats: IndexMap<String, GeneratorDescriptor>,
    converter: Box<dyn ColorConverter + Send + Sync>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl FormatRegistry {
    /// An empty registry using [`CssColorConverter`].
    pub fn new() -> Self {
        Self {
            formats: IndexMap::new(),
            converter: Box::new(CssColorConverter),
        }
    }

    /// A registry with the five built-in formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_formats() {
            registry.register(descriptor);
        }
        registry
    }

    /// Replaces the color converter handed to emitters.
    pub fn with_converter(mut self, converter: impl ColorConverter + Send + Sync + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Adds a format, replacing any format with the same id.
    pub fn register(&mut self, descriptor: GeneratorDescriptor) -> &mut Self {
        debug!(format = %descriptor.id, "format registered");
        self.formats.insert(descriptor.id.clone(), descriptor);
        self
    }

    pub fn get(&self, id: &str) -> Option<&GeneratorDescriptor> {
        self.formats.get(id)
    }

    /// Registered formats in registration order.
    pub fn formats(&self) -> impl Iterator<Item = &GeneratorDescriptor> {
        self.formats.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Processes `doc` and renders it in one format.
    pub fn generate(
        &self,
        doc: &ThemeDocument,
        format: &str,
        options: &GenerateOptions,
    ) -> Result<Generated, GenerateError> {
        let descriptor = self.get(format).ok_or_else(|| GenerateError::UnknownFormat {
            requested: format.to_string(),
            available: self.ids(),
        })?;

        let resolved = catch_unwind(AssertUnwindSafe(|| {
            process_theme(doc, &options.process_options()).resolved
        }))
        .map_err(|payload| GenerateError::Panicked {
            format: descriptor.id.clone(),
            message: panic_message(payload.as_ref()),
        })?;

        let content = self.run(descriptor, &resolved, options)?;
        let (ext, content_type) = descriptor.output(options);
        Ok(Generated {
            format: descriptor.id.clone(),
            content,
            ext,
            content_type,
        })
    }

    /// Processes `doc` once and renders it in every registered format.
    pub fn generate_all(&self, doc: &ThemeDocument, options: &GenerateOptions) -> Vec<FormatResult> {
        let processed = catch_unwind(AssertUnwindSafe(|| {
            process_theme(doc, &options.process_options()).resolved
        }));

        let resolved = match processed {
            Ok(resolved) => resolved,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(error = %message, "theme processing panicked; every format fails");
                return self
                    .formats()
                    .map(|descriptor| {
                        let (ext, content_type) = descriptor.output(options);
                        FormatResult {
                            format: descriptor.id.clone(),
                            ext,
                            content_type,
                            outcome: Err(GenerateError::Panicked {
                                format: descriptor.id.clone(),
                                message: message.clone(),
                            }),
                        }
                    })
                    .collect();
            }
        };

        self.formats()
            .map(|descriptor| {
                let outcome = self.run(descriptor, &resolved, options);
                if let Err(err) = &outcome {
                    warn!(format = %descriptor.id, error = %err, "format generation failed");
                }
                let (ext, content_type) = descriptor.output(options);
                FormatResult {
                    format: descriptor.id.clone(),
                    ext,
                    content_type,
                    outcome,
                }
            })
            .collect()
    }

    /// Runs one emitter, turning errors and panics into [`GenerateError`].
    fn run(
        &self,
        descriptor: &GeneratorDescriptor,
        theme: &ResolvedTheme,
        options: &GenerateOptions,
    ) -> Result<String, GenerateError> {
        let ctx = EmitContext {
            theme,
            options,
            converter: self.converter.as_ref(),
        };
        match catch_unwind(AssertUnwindSafe(|| (descriptor.emitter)(&ctx))) {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(source)) => Err(GenerateError::Emit {
                format: descriptor.id.clone(),
                source,
            }),
            Err(payload) => Err(GenerateError::Panicked {
                format: descriptor.id.clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn tailwind_output(options: &GenerateOptions) -> Option<(&'static str, &'static str)> {
    match options.tailwind.variant {
        TailwindVariant::TypeScript => None,
        TailwindVariant::JavaScript => Some(("js", "text/javascript")),
    }
}

fn builtin_formats() -> Vec<GeneratorDescriptor> {
    vec![
        GeneratorDescriptor::new(
            "css",
            "CSS Variables",
            "CSS custom properties with a dark-mode block and keyframes",
            "css",
            "text/css",
            css::emit,
        ),
        GeneratorDescriptor::new(
            "scss",
            "SCSS Variables",
            "SCSS variables, dark-mode entries prefixed",
            "scss",
            "text/x-scss",
            scss::emit,
        ),
        GeneratorDescriptor::new(
            "tailwind",
            "Tailwind Config",
            "Tailwind theme extension referencing the CSS variables",
            "ts",
            "application/typescript",
            tailwind::emit,
        )
        .with_output_override(tailwind_output),
        GeneratorDescriptor::new(
            "figma",
            "Figma Tokens",
            "Tokens Studio document with global, light and dark sets",
            "json",
            "application/json",
            figma::emit,
        ),
        GeneratorDescriptor::new(
            "style-dictionary",
            "Style Dictionary",
            "Style Dictionary token tree with optional metadata",
            "json",
            "application/json",
            style_dictionary::emit,
        ),
    ]
}
