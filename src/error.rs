//! Error types for catalog operations.

use thiserror::Error;

/// Errors raised by the catalog model, the codec and locale switching.
///
/// Per-entry extraction problems are not errors: they are reported as
/// [`ExtractionIssue`](crate::core::ExtractionIssue) values and never abort a
/// merge.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The persisted catalog is malformed. No partial catalog is produced.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// A mutation would give two messages of one context the same identity.
    #[error("duplicate message {} in context '{context}'", describe_key(.source_text, .disambiguation))]
    DuplicateKey {
        context: String,
        source_text: String,
        disambiguation: Option<String>,
    },

    /// A [`MessageRef`](crate::core::MessageRef) outlived the structure it
    /// pointed into.
    #[error("message reference {context}:{message} is out of range")]
    StaleReference { context: usize, message: usize },

    /// No catalog is loaded for the requested locale.
    #[error("no catalog available for locale '{0}'")]
    LocaleUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_key(source_text: &str, disambiguation: &Option<String>) -> String {
    match disambiguation {
        Some(d) => format!("\"{}\" ({})", source_text, d),
        None => format!("\"{}\"", source_text),
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
