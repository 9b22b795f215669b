//! Validate command implementation

use anyhow::Result;
use clap::Args;
use glosstip_core::{GlossaryIndex, GlossaryStore};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::error::CliError;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(short, long, value_name = "FILE", required_unless_present = "glossary")]
    pub config: Option<PathBuf>,

    /// Glossary file to validate
    #[arg(short, long, value_name = "FILE")]
    pub glossary: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => {
                println!("Validating configuration: {}", path.display());
                let config = Self::report(CliConfig::from_file(path))?;
                println!("  Vocabulary: {}", config.filter.vocabulary().unwrap_or("(none)"));
                println!("  Automatic: {}", config.filter.automatic);
                println!("  Trigger event: {}", config.filter.trigger_event);
                Some(config)
            }
            None => None,
        };

        if let Some(path) = &self.glossary {
            println!("Validating glossary: {}", path.display());
            let store = Self::report(GlossaryStore::from_file(path).map_err(anyhow::Error::from))?;

            for vocabulary in store.vocabularies() {
                let usable = GlossaryIndex::build(vocabulary.terms.iter().cloned()).len();
                println!(
                    "  {}: {} term(s), {} usable",
                    vocabulary.id,
                    vocabulary.terms.len(),
                    usable
                );
            }

            if let Some(id) = config.as_ref().and_then(|c| c.filter.vocabulary()) {
                if store.vocabulary(id).is_none() {
                    println!("✗ Configured vocabulary '{id}' is not in the glossary");
                    return Err(CliError::VocabularyNotFound(id.to_string()).into());
                }
            }
        }

        Ok(())
    }

    fn report<T>(result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                println!("✓ Valid");
                Ok(value)
            }
            Err(e) => {
                println!("✗ Invalid");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }
}
