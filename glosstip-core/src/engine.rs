//! Annotation engine: one pass over the text, one decision per match
//!
//! For each call the engine
//!
//! 1. scans the text once with the combined, case-insensitive term pattern,
//! 2. decides per match whether to annotate or pass it through (tag markup,
//!    markup guard, key resolution, occurrence cap),
//! 3. renders the annotated matches and splices them into a copy of the text.
//!
//! Decisions are made before any rendering, so a formatter error never leaves
//! a half-annotated string behind.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

use crate::error::{GlossError, Result};
use crate::glossary::{normalize_key, GlossaryIndex};
use crate::markup::{GuardScope, MarkupGuard, ANCHOR_TAG};
use crate::render::{render_occurrence, Render};
use crate::tracker::{OccurrenceLimit, OccurrenceTracker};

/// Compiled size budget for the combined term pattern
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Where annotation is forbidden and how often a term may be annotated
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Tags whose content is never annotated (anchors always are excluded)
    pub excluded_tags: Vec<String>,
    /// Per-term annotation cap
    pub occurrence_limit: OccurrenceLimit,
    /// Reach of the markup guards' forward scan
    pub guard_scope: GuardScope,
}

impl ExclusionConfig {
    /// Configuration with no excluded tags and no cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a space separated tag list such as `"h1 div"`
    pub fn parse_tags(tags: &str) -> Vec<String> {
        tags.split_whitespace().map(str::to_string).collect()
    }

    /// Set the excluded tags
    pub fn with_excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the occurrence cap
    pub fn with_limit(mut self, limit: OccurrenceLimit) -> Self {
        self.occurrence_limit = limit;
        self
    }

    /// Set the guard scope
    pub fn with_guard_scope(mut self, scope: GuardScope) -> Self {
        self.guard_scope = scope;
        self
    }
}

/// Upper bounds protecting the engine from oversized input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum text size in bytes
    pub max_text_bytes: Option<usize>,
    /// Maximum number of glossary entries
    pub max_terms: Option<usize>,
}

/// Why a match was left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "tag")]
pub enum PassthroughReason {
    /// The term already reached its occurrence cap
    Limit,
    /// The match sits inside a tag's own markup, such as an attribute value
    InsideTag,
    /// The match sits inside a link
    Anchor,
    /// The match sits inside an excluded tag
    ExcludedTag(String),
    /// The matched text did not resolve to a glossary key
    UnknownKey,
}

/// What to do with one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Replace the match with rendered tooltip markup
    Annotate,
    /// Keep the original text byte for byte
    Passthrough(PassthroughReason),
}

/// Decision for one candidate match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDecision<'t> {
    /// Byte range of the match in the input
    pub range: Range<usize>,
    /// Matched text with its original case
    pub matched_text: &'t str,
    /// Normalized key the match resolved to
    pub resolved_key: String,
    /// Annotate or pass through
    pub action: Action,
}

/// Per-call match counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnotationStats {
    /// Candidate matches found by the pattern
    pub matches_found: usize,
    /// Matches replaced with a tooltip
    pub annotated: usize,
    /// Matches left unchanged because the term hit its cap
    pub limited: usize,
    /// Matches left unchanged inside tag markup, anchors or excluded tags
    pub guarded: usize,
    /// Matches whose text did not resolve to a key
    pub unresolved: usize,
}

impl AnnotationStats {
    /// Tally a list of decisions
    pub fn from_decisions(decisions: &[MatchDecision<'_>]) -> Self {
        let mut stats = Self {
            matches_found: decisions.len(),
            ..Self::default()
        };

        for decision in decisions {
            match &decision.action {
                Action::Annotate => stats.annotated += 1,
                Action::Passthrough(PassthroughReason::Limit) => stats.limited += 1,
                Action::Passthrough(PassthroughReason::InsideTag)
                | Action::Passthrough(PassthroughReason::Anchor)
                | Action::Passthrough(PassthroughReason::ExcludedTag(_)) => stats.guarded += 1,
                Action::Passthrough(PassthroughReason::UnknownKey) => stats.unresolved += 1,
            }
        }

        stats
    }

    /// Add another call's counts
    pub fn merge(&mut self, other: &AnnotationStats) {
        self.matches_found += other.matches_found;
        self.annotated += other.annotated;
        self.limited += other.limited;
        self.guarded += other.guarded;
        self.unresolved += other.unresolved;
    }
}

/// Annotated text with the counts that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotated {
    /// Transformed text
    pub text: String,
    /// Match statistics for this call
    pub stats: AnnotationStats,
}

impl Annotated {
    /// Wrap text that was returned without scanning
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            stats: AnnotationStats::default(),
        }
    }
}

/// A glossary index compiled into a scanning pattern
///
/// Compile once per index and share it: the engine is immutable and every
/// call creates its own [`OccurrenceTracker`].
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    index: Arc<GlossaryIndex>,
    pattern: Option<Regex>,
    limits: Limits,
}

impl AnnotationEngine {
    /// Compile an engine without size limits
    pub fn new(index: impl Into<Arc<GlossaryIndex>>) -> Result<Self> {
        Self::with_limits(index, Limits::default())
    }

    /// Compile an engine enforcing `limits`
    pub fn with_limits(index: impl Into<Arc<GlossaryIndex>>, limits: Limits) -> Result<Self> {
        let index = index.into();

        if let Some(max) = limits.max_terms {
            if index.len() > max {
                return Err(GlossError::GlossaryTooLarge {
                    count: index.len(),
                    max,
                });
            }
        }

        let pattern = match index.alternation() {
            Some(alternation) => Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .size_limit(PATTERN_SIZE_LIMIT)
                    .build()?,
            ),
            None => None,
        };

        tracing::debug!(terms = index.len(), "compiled annotation engine");

        Ok(Self {
            index,
            pattern,
            limits,
        })
    }

    /// The index this engine was compiled from
    pub fn index(&self) -> &GlossaryIndex {
        &self.index
    }

    /// Configured limits
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Decide the fate of every match without rendering anything
    pub fn plan<'t>(&self, text: &'t str, config: &ExclusionConfig) -> Result<Vec<MatchDecision<'t>>> {
        let Some(pattern) = self.pattern.as_ref().filter(|_| !text.is_empty()) else {
            return Ok(Vec::new());
        };

        if let Some(max) = self.limits.max_text_bytes {
            if text.len() > max {
                return Err(GlossError::InputTooLarge {
                    len: text.len(),
                    max,
                });
            }
        }

        let guard = MarkupGuard::scan(text, &config.excluded_tags, config.guard_scope);
        let mut tracker = OccurrenceTracker::new();

        let decisions = pattern
            .find_iter(text)
            .map(|found| {
                let matched_text = found.as_str();
                let resolved_key = normalize_key(matched_text);

                let action = if guard.inside_tag(found.start()) {
                    Action::Passthrough(PassthroughReason::InsideTag)
                } else if let Some(tag) = guard.enclosing(found.end()) {
                    if tag == ANCHOR_TAG {
                        Action::Passthrough(PassthroughReason::Anchor)
                    } else {
                        Action::Passthrough(PassthroughReason::ExcludedTag(tag.to_string()))
                    }
                } else if self.index.get(&resolved_key).is_none() {
                    Action::Passthrough(PassthroughReason::UnknownKey)
                } else if tracker.try_record(&resolved_key, config.occurrence_limit) {
                    Action::Annotate
                } else {
                    Action::Passthrough(PassthroughReason::Limit)
                };

                tracing::trace!(matched = matched_text, action = ?action, "match decision");

                MatchDecision {
                    range: found.range(),
                    matched_text,
                    resolved_key,
                    action,
                }
            })
            .collect();

        Ok(decisions)
    }

    /// Annotate `text`, rendering each accepted match with `renderer`
    ///
    /// Empty text or an empty index returns the text unchanged. A formatter
    /// error aborts the call; no partially annotated text is returned.
    pub fn annotate<R>(&self, text: &str, config: &ExclusionConfig, renderer: &R) -> Result<Annotated>
    where
        R: Render + ?Sized,
    {
        if text.is_empty() || self.pattern.is_none() {
            return Ok(Annotated::unchanged(text));
        }

        let decisions = self.plan(text, config)?;
        let stats = AnnotationStats::from_decisions(&decisions);

        let mut output = String::with_capacity(text.len() + stats.annotated * 64);
        let mut cursor = 0;

        for decision in decisions.iter().filter(|d| d.action == Action::Annotate) {
            let description = self
                .index
                .get(&decision.resolved_key)
                .map(|entry| entry.description())
                .unwrap_or_default();
            let rendered = render_occurrence(renderer, decision.matched_text, description)?;

            output.push_str(&text[cursor..decision.range.start]);
            output.push_str(&rendered);
            cursor = decision.range.end;
        }
        output.push_str(&text[cursor..]);

        tracing::debug!(
            found = stats.matches_found,
            annotated = stats.annotated,
            limited = stats.limited,
            guarded = stats.guarded,
            "annotated text"
        );

        Ok(Annotated {
            text: output,
            stats,
        })
    }
}

/// One-shot annotation
///
/// Compiles the pattern for this call; callers annotating many texts with the
/// same glossary should keep an [`AnnotationEngine`] instead.
pub fn annotate<R>(
    text: &str,
    index: &GlossaryIndex,
    config: &ExclusionConfig,
    renderer: &R,
) -> Result<Annotated>
where
    R: Render + ?Sized,
{
    if text.is_empty() || index.is_empty() {
        return Ok(Annotated::unchanged(text));
    }

    AnnotationEngine::new(index.clone())?.annotate(text, config, renderer)
}
