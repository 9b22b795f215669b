//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Vocabulary to preselect in the template
    #[arg(long, value_name = "ID")]
    pub vocabulary: Option<String>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template();

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to choose a vocabulary and limits");
        println!("2. Validate your configuration against a glossary:");
        println!(
            "   glosstip validate --config {} --glossary glossary.toml",
            self.output.display()
        );
        println!("3. Use it for annotation:");
        println!(
            "   glosstip annotate -i 'pages/*.html' -g glossary.toml --config {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        let vocabulary = match &self.vocabulary {
            Some(id) => format!("vocabulary = \"{id}\""),
            None => "# vocabulary = \"nutrition\"".to_string(),
        };

        format!(
            r#"# glosstip configuration

[filter]
# Vocabulary whose terms become tooltips. Without one, files pass through
# unchanged (a glossary with a single vocabulary selects it automatically).
{vocabulary}

# Annotate automatically; false leaves the text untouched
automatic = true

# Maximum tooltips per term and document: -1 for all, 1 for the first only
occurrence_limit = -1

# Space separated tags whose content never gets tooltips (links never do)
exclude_tags = "h1 h2 h3"

# Event that opens a tooltip: "click" or "mouseover"
trigger_event = "click"

# How far the tag check looks ahead: "line" or "document"
guard_scope = "document"

[output]
# "html" or "json"
default_format = "html"
pretty_json = true

[performance]
# Number of worker threads (0 = all CPUs)
worker_threads = 0

# Optional input limits
# max_text_bytes = 10485760
# max_terms = 10000
"#
        )
    }
}
