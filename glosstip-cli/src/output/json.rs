//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use glosstip_core::{AnnotationStats, Attachments, FilterResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter - outputs documents as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    documents: Vec<DocumentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentData {
    /// Source file
    pub path: String,
    /// Annotated text
    pub text: String,
    /// Assets the page must load
    pub attachments: Option<Attachments>,
    /// Match statistics
    pub stats: AnnotationStats,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            documents: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, path: &Path, result: &FilterResult) -> Result<()> {
        self.documents.push(DocumentData {
            path: path.display().to_string(),
            text: result.text.clone(),
            attachments: result.attachments.clone(),
            stats: result.stats,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
