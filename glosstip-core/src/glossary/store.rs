//! Glossary files: vocabularies of terms loaded from TOML or JSON
//!
//! ```toml
//! [[vocabulary]]
//! id = "nutrition"
//! name = "Nutrition"
//!
//! [[vocabulary.terms]]
//! name = "Milk powder"
//! description = "Milk dried to a powder."
//! id = "12"
//! langcode = "en"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::index::RawTerm;
use crate::error::{GlossError, Result};

/// Supported glossary file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlossaryFormat {
    /// TOML with `[[vocabulary]]` tables
    Toml,
    /// JSON object with a `vocabulary` array
    Json,
}

impl GlossaryFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(GlossaryFormat::Toml),
            Some("json") => Ok(GlossaryFormat::Json),
            _ => Err(GlossError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A named set of glossary terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Identifier referenced from filter settings
    pub id: String,
    /// Human readable name
    #[serde(default)]
    pub name: String,
    /// Terms in editorial order
    #[serde(default)]
    pub terms: Vec<RawTerm>,
}

impl Vocabulary {
    /// Terms for `langcode`, in order
    ///
    /// Terms without a langcode apply to every language; `None` selects all
    /// terms.
    pub fn terms_for<'a>(&'a self, langcode: Option<&'a str>) -> impl Iterator<Item = &'a RawTerm> {
        self.terms.iter().filter(move |term| match (langcode, term.langcode.as_deref()) {
            (Some(wanted), Some(have)) => wanted.eq_ignore_ascii_case(have),
            _ => true,
        })
    }
}

/// All vocabularies available to the filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryStore {
    #[serde(rename = "vocabulary", default)]
    vocabularies: Vec<Vocabulary>,
}

impl GlossaryStore {
    /// Create a store from already loaded vocabularies
    pub fn new(vocabularies: Vec<Vocabulary>) -> Result<Self> {
        let store = Self { vocabularies };
        store.validate()?;
        Ok(store)
    }

    /// Parse a TOML glossary
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let store: Self = toml::from_str(content)?;
        store.validate()?;
        Ok(store)
    }

    /// Parse a JSON glossary
    pub fn from_json_str(content: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(content)?;
        store.validate()?;
        Ok(store)
    }

    /// Load a glossary file, choosing the parser from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = GlossaryFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let store = match format {
            GlossaryFormat::Toml => Self::from_toml_str(&content)?,
            GlossaryFormat::Json => Self::from_json_str(&content)?,
        };

        tracing::debug!(
            path = %path.display(),
            vocabularies = store.vocabularies.len(),
            "loaded glossary"
        );
        Ok(store)
    }

    /// Find a vocabulary by id
    pub fn vocabulary(&self, id: &str) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|vocabulary| vocabulary.id == id)
    }

    /// All vocabularies in file order
    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    /// Total number of terms across vocabularies
    pub fn term_count(&self) -> usize {
        self.vocabularies.iter().map(|v| v.terms.len()).sum()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for vocabulary in &self.vocabularies {
            if vocabulary.id.trim().is_empty() {
                return Err(GlossError::Configuration(
                    "vocabulary id must not be empty".into(),
                ));
            }
            if !seen.insert(vocabulary.id.as_str()) {
                return Err(GlossError::Configuration(format!(
                    "duplicate vocabulary id: {}",
                    vocabulary.id
                )));
            }
        }
        Ok(())
    }
}
