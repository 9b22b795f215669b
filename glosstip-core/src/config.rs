//! Filter settings as stored in `glosstip.toml`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::ExclusionConfig;
use crate::error::Result;
use crate::markup::GuardScope;
use crate::tracker::OccurrenceLimit;

/// Client-side event that opens a tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEvent {
    /// Open on click or tap
    #[default]
    Click,
    /// Open on hover
    Mouseover,
}

impl TriggerEvent {
    /// Name used in settings files and attachments
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::Click => "click",
            TriggerEvent::Mouseover => "mouseover",
        }
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TriggerEvent {
    type Err = crate::error::GlossError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "click" => Ok(TriggerEvent::Click),
            "mouseover" => Ok(TriggerEvent::Mouseover),
            other => Err(crate::error::GlossError::Configuration(format!(
                "unknown trigger event: {other} (expected click or mouseover)"
            ))),
        }
    }
}

/// Settings of one tooltip filter instance
///
/// ```toml
/// vocabulary = "nutrition"
/// occurrence_limit = 1
/// automatic = true
/// exclude_tags = "h1 h2 code"
/// trigger_event = "mouseover"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Vocabulary whose terms are annotated; unset disables the filter
    pub vocabulary: Option<String>,
    /// Maximum annotations per term; `-1` is unlimited
    pub occurrence_limit: OccurrenceLimit,
    /// Annotate automatically; when false the text passes through untouched
    pub automatic: bool,
    /// Space separated names of tags whose content is never annotated
    pub exclude_tags: String,
    /// Event that opens the tooltip on the client
    pub trigger_event: TriggerEvent,
    /// Reach of the markup guards
    pub guard_scope: GuardScope,
}

impl FilterSettings {
    /// Parse settings from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Configured vocabulary, ignoring an empty id
    pub fn vocabulary(&self) -> Option<&str> {
        self.vocabulary
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Excluded tag names as a list
    pub fn excluded_tags(&self) -> Vec<String> {
        ExclusionConfig::parse_tags(&self.exclude_tags)
    }

    /// Engine configuration derived from these settings
    pub fn exclusion_config(&self) -> ExclusionConfig {
        ExclusionConfig::new()
            .with_excluded_tags(self.excluded_tags())
            .with_limit(self.occurrence_limit)
            .with_guard_scope(self.guard_scope)
    }
}
