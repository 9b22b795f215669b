//! HTML output formatter

use super::OutputFormatter;
use anyhow::Result;
use glosstip_core::FilterResult;
use std::io::Write;
use std::path::Path;

/// HTML formatter - writes annotated documents back to back, unchanged
/// otherwise
pub struct HtmlFormatter<W: Write> {
    writer: W,
}

impl<W: Write> HtmlFormatter<W> {
    /// Create a new HTML formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for HtmlFormatter<W> {
    fn format_document(&mut self, _path: &Path, result: &FilterResult) -> Result<()> {
        self.writer.write_all(result.text.as_bytes())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
