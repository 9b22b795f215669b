//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A document read from disk
#[derive(Debug, Clone)]
pub struct Document {
    /// Source path
    pub path: PathBuf,
    /// Document contents
    pub text: String,
}

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read every file, failing on the first unreadable one
    pub fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
        paths
            .iter()
            .map(|path| {
                Ok(Document {
                    path: path.clone(),
                    text: Self::read_text(path)?,
                })
            })
            .collect()
    }
}
