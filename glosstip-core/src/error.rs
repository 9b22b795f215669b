//! Error types for glossary loading and annotation

use thiserror::Error;

use crate::render::RenderError;

/// Error type for glosstip operations
#[derive(Debug, Error)]
pub enum GlossError {
    /// Invalid settings or glossary content
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The tooltip formatter refused a match
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Input text exceeds the configured size limit
    #[error("Input too large: {len} bytes exceeds the limit of {max} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes
        len: usize,
        /// Configured maximum in bytes
        max: usize,
    },

    /// Glossary exceeds the configured term limit
    #[error("Glossary too large: {count} terms exceeds the limit of {max} terms")]
    GlossaryTooLarge {
        /// Number of terms in the rejected glossary
        count: usize,
        /// Configured maximum number of terms
        max: usize,
    },

    /// The combined term pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error while reading glossary or settings files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither TOML nor JSON
    #[error("Unsupported glossary format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for glosstip operations
pub type Result<T> = std::result::Result<T, GlossError>;
