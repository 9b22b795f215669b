//! Output formatting module

use anyhow::Result;
use glosstip_core::FilterResult;
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output one annotated document
    fn format_document(&mut self, path: &Path, result: &FilterResult) -> Result<()>;

    /// Finalize output (e.g., write the JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod html;
pub mod json;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
