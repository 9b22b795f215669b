//! Ordered glossary index
//!
//! Entries keep the order in which the glossary source listed them; that
//! order is the alternation order of the scanning pattern, so when two terms
//! match at the same position the earlier-listed one wins.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default length (in characters) above which descriptions are truncated
pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 100;

/// A glossary term as supplied by the glossary source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTerm {
    /// Term text as written by the editor
    pub name: String,
    /// Explanation shown in the tooltip; empty terms are skipped
    #[serde(default)]
    pub description: String,
    /// Opaque identifier used for the "read more" link
    #[serde(default, alias = "id")]
    pub source_id: String,
    /// Language of the term; `None` applies to every language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub langcode: Option<String>,
}

impl RawTerm {
    /// Create a language-neutral term
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source_id: source_id.into(),
            langcode: None,
        }
    }

    /// Restrict the term to one language
    pub fn with_langcode(mut self, langcode: impl Into<String>) -> Self {
        self.langcode = Some(langcode.into());
        self
    }
}

/// Controls how long descriptions are shortened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionPolicy {
    /// Descriptions longer than this many characters are truncated
    pub max_chars: usize,
    /// Prefix of the "read more" link; the source id is appended
    pub link_prefix: String,
    /// Label of the "read more" link
    pub read_more_label: String,
}

impl Default for DescriptionPolicy {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_DESCRIPTION_CHARS,
            link_prefix: "/taxonomy/term/".to_string(),
            read_more_label: "Read more".to_string(),
        }
    }
}

impl DescriptionPolicy {
    /// Shorten `description` if needed, appending a link to `source_id`
    pub fn apply(&self, description: &str, source_id: &str) -> String {
        match description.char_indices().nth(self.max_chars) {
            None => description.to_string(),
            Some((cut, _)) => format!(
                r#"{} ... <a class="read-more" href="{}{}">{}</a>"#,
                &description[..cut],
                self.link_prefix,
                source_id,
                self.read_more_label
            ),
        }
    }
}

/// Normalize term text into its lookup key
///
/// Both index construction and match resolution go through this function, so
/// a matched literal resolves to the key its term was filed under. The
/// scanning pattern is built from the term as written rather than from the
/// key: full lowercasing can change a term's length ("İ" becomes "i̇"), which
/// the pattern's simple case folding would no longer match.
pub fn normalize_key(text: &str) -> String {
    text.to_lowercase()
}

/// One usable glossary term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    key: String,
    pattern: String,
    description: String,
    source_id: String,
}

impl GlossaryEntry {
    /// Normalized (lowercase) term text
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Term as first written, with every regex-special character escaped
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Description after truncation
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Identifier of the source term
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

/// Ordered, immutable mapping from normalized key to entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossaryIndex {
    entries: Vec<GlossaryEntry>,
    positions: HashMap<String, usize>,
}

impl GlossaryIndex {
    /// An index with no terms; annotation with it is a no-op
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index with the default [`DescriptionPolicy`]
    pub fn build<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = RawTerm>,
    {
        Self::build_with_policy(terms, &DescriptionPolicy::default())
    }

    /// Build an index, truncating descriptions per `policy`
    ///
    /// Terms with an empty description or a blank name are skipped. When two
    /// terms normalize to the same key the later one replaces the earlier
    /// one's description and source id but keeps its position and spelling.
    pub fn build_with_policy<I>(terms: I, policy: &DescriptionPolicy) -> Self
    where
        I: IntoIterator<Item = RawTerm>,
    {
        let mut index = Self::empty();

        for term in terms {
            if term.description.is_empty() {
                tracing::trace!(name = %term.name, "skipping term without description");
                continue;
            }
            if term.name.trim().is_empty() {
                tracing::warn!(source_id = %term.source_id, "skipping term with blank name");
                continue;
            }

            let key = normalize_key(&term.name);
            let description = policy.apply(&term.description, &term.source_id);

            match index.positions.get(&key) {
                Some(&pos) => {
                    tracing::debug!(key = %key, "duplicate glossary key, later term wins");
                    let entry = &mut index.entries[pos];
                    entry.description = description;
                    entry.source_id = term.source_id;
                }
                None => {
                    index.positions.insert(key.clone(), index.entries.len());
                    index.entries.push(GlossaryEntry {
                        pattern: regex::escape(&term.name),
                        description,
                        source_id: term.source_id,
                        key,
                    });
                }
            }
        }

        index
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to annotate
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by normalized key
    pub fn get(&self, key: &str) -> Option<&GlossaryEntry> {
        self.positions.get(key).map(|&pos| &self.entries[pos])
    }

    /// Entries in pattern order
    pub fn iter(&self) -> impl Iterator<Item = &GlossaryEntry> {
        self.entries.iter()
    }

    /// Normalized keys in pattern order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(GlossaryEntry::key)
    }

    /// Alternation of all entry patterns in index order, or `None` if empty
    pub fn alternation(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let alternatives: Vec<&str> = self.entries.iter().map(GlossaryEntry::pattern).collect();
        Some(alternatives.join("|"))
    }
}

impl FromIterator<RawTerm> for GlossaryIndex {
    fn from_iter<I: IntoIterator<Item = RawTerm>>(iter: I) -> Self {
        Self::build(iter)
    }
}
