//! CLI command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use glosstip_core::GlossaryStore;
use std::path::PathBuf;

pub mod annotate;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add tooltips for glossary terms to HTML files
    Annotate(annotate::AnnotateArgs),

    /// Check a configuration and/or glossary file
    Validate(validate::ValidateArgs),

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Annotate(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List the vocabularies of a glossary
    Vocabularies {
        /// Glossary file (TOML or JSON)
        #[arg(short, long, value_name = "FILE", env = "GLOSSTIP_GLOSSARY")]
        glossary: PathBuf,
    },

    /// List available output formats
    Formats,
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Vocabularies { glossary } => {
                let store = GlossaryStore::from_file(glossary)
                    .with_context(|| format!("Failed to load glossary: {}", glossary.display()))?;

                println!("Vocabularies:");
                for vocabulary in store.vocabularies() {
                    let name = if vocabulary.name.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", vocabulary.name)
                    };
                    println!(
                        "  {}{} - {} term(s)",
                        vocabulary.id,
                        name,
                        vocabulary.terms.len()
                    );
                }
            }
            ListCommands::Formats => {
                println!("Output formats:");
                println!("  html - Annotated HTML");
                println!("  json - JSON array with text, attachments and statistics");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_commands_debug_format() {
        let list_cmd = Commands::List {
            subcommand: ListCommands::Formats,
        };

        let debug_str = format!("{:?}", list_cmd);
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Formats"));
    }

    #[test]
    fn test_list_formats() {
        assert!(ListCommands::Formats.execute().is_ok());
    }

    #[test]
    fn test_list_vocabularies() {
        let dir = TempDir::new().unwrap();
        let glossary = dir.path().join("glossary.json");
        fs::write(
            &glossary,
            r#"{"vocabulary": [{"id": "a", "name": "A"}, {"id": "b"}]}"#,
        )
        .unwrap();

        let command = Commands::List {
            subcommand: ListCommands::Vocabularies { glossary },
        };
        assert!(command.execute().is_ok());
    }

    #[test]
    fn test_list_vocabularies_missing_file() {
        let command = ListCommands::Vocabularies {
            glossary: PathBuf::from("/nonexistent/glossary.toml"),
        };
        let error = command.execute().unwrap_err();
        assert!(error.to_string().contains("Failed to load glossary"));
    }
}
