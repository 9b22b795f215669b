//! Configuration module

use anyhow::{Context, Result};
use glosstip_core::{FilterSettings, Limits};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CliError;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct CliConfig {
    /// Tooltip filter settings
    #[serde(default = "default_filter")]
    pub filter: FilterSettings,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            output: OutputConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

/// Filter settings used when the config has no `[filter]` table
///
/// Running the CLI means asking for annotation, so automatic mode is on.
fn default_filter() -> FilterSettings {
    FilterSettings {
        automatic: true,
        ..FilterSettings::default()
    }
}

impl CliConfig {
    /// Parse configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        match self.output.default_format.as_str() {
            "html" | "json" => {}
            other => {
                return Err(CliError::ConfigError(format!(
                    "unknown output format: {other} (expected html or json)"
                ))
                .into())
            }
        }

        if self.performance.max_text_bytes == Some(0) || self.performance.max_terms == Some(0) {
            return Err(CliError::ConfigError("limits must be greater than 0".into()).into());
        }

        Ok(())
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "html".to_string(),
            pretty_json: true,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,

    /// Largest accepted input file in bytes
    pub max_text_bytes: Option<usize>,

    /// Largest accepted vocabulary in terms
    pub max_terms: Option<usize>,
}

impl PerformanceConfig {
    /// Worker threads, resolving 0 to the number of CPUs
    pub fn threads(&self) -> usize {
        match self.worker_threads {
            0 => num_cpus::get(),
            n => n,
        }
    }

    /// Engine limits
    pub fn limits(&self) -> Limits {
        Limits {
            max_text_bytes: self.max_text_bytes,
            max_terms: self.max_terms,
        }
    }
}
