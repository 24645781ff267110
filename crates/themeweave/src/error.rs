//! Error types for theme processing and token generation.
//!
//! Resolution faults ([`ReferenceError`]) are recovered locally during
//! generation and surfaced as hard errors by the validator. [`GenerateError`]
//! is the only error a caller of [`FormatRegistry::generate`] ever sees.
//!
//! [`FormatRegistry::generate`]: crate::FormatRegistry::generate

use thiserror::Error;

/// Errors raised while dereferencing a `{"$ref": "..."}` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The indirection chain reached the depth limit.
    #[error("reference '{path}' exceeds the maximum depth of {limit}")]
    DepthExceeded { path: String, limit: usize },

    /// The path was already visited on the current chain.
    #[error("circular reference detected: {}", chain.join(" -> "))]
    Circular { path: String, chain: Vec<String> },

    /// The path contains a reserved or empty segment.
    #[error("unsafe reference path '{path}': segment '{segment}' is not allowed")]
    UnsafePath { path: String, segment: String },

    /// A segment along the path does not exist in the document.
    #[error("reference '{path}' not found: missing segment '{segment}'")]
    NotFound { path: String, segment: String },
}

impl ReferenceError {
    /// Returns the pointer path that failed to resolve.
    pub fn path(&self) -> &str {
        match self {
            ReferenceError::DepthExceeded { path, .. }
            | ReferenceError::Circular { path, .. }
            | ReferenceError::UnsafePath { path, .. }
            | ReferenceError::NotFound { path, .. } => path,
        }
    }
}

/// Errors raised while parsing a theme document or an options file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but its root is not a mapping.
    #[error("theme document root must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Errors raised by a single format emitter.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Errors returned by the format registry.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No emitter is registered under the requested identifier.
    #[error("unknown format '{requested}'; valid formats: {}", available.join(", "))]
    UnknownFormat {
        requested: String,
        available: Vec<String>,
    },

    /// The emitter returned an error.
    #[error("{format} emitter failed: {source}")]
    Emit {
        format: String,
        #[source]
        source: EmitError,
    },

    /// Processing or emission panicked; the payload message is kept.
    #[error("{format} generation panicked: {message}")]
    Panicked { format: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_display_shows_chain() {
        let err = ReferenceError::Circular {
            path: "scales.a".to_string(),
            chain: vec!["scales.a".into(), "scales.b".into(), "scales.a".into()],
        };
        assert!(err.to_string().contains("scales.a -> scales.b -> scales.a"));
        assert_eq!(err.path(), "scales.a");
    }

    #[test]
    fn test_not_found_names_segment() {
        let err = ReferenceError::NotFound {
            path: "scales.teal.steps".to_string(),
            segment: "teal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("scales.teal.steps"));
        assert!(msg.contains("'teal'"));
    }

    #[test]
    fn test_unknown_format_lists_available() {
        let err = GenerateError::UnknownFormat {
            requested: "xml".to_string(),
            available: vec!["css".into(), "scss".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'xml'"));
        assert!(msg.contains("css, scss"));
    }
}
