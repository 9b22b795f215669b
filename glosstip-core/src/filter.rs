//! Tooltip text filter
//!
//! Wires filter settings, a glossary store and a renderer together. A filter
//! is prepared once per language, which compiles the vocabulary into an
//! [`AnnotationEngine`]; the prepared filter is then applied to any number of
//! texts.

use serde::Serialize;
use std::sync::Arc;

use crate::config::{FilterSettings, TriggerEvent};
use crate::engine::{Annotated, AnnotationEngine, AnnotationStats, ExclusionConfig, Limits};
use crate::error::Result;
use crate::glossary::{DescriptionPolicy, GlossaryIndex, GlossaryStore};
use crate::render::{Render, TooltipTemplate};

/// Client library that displays the tooltips
pub const TOOLTIP_LIBRARY: &str = "glosstip/tooltips";

/// Short description of what the filter does
pub const FILTER_TIPS: &str = "Replace glossary terms in text with tooltips.";

/// Client-side settings shipped with the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSettings {
    /// Event that opens a tooltip
    pub trigger_event: TriggerEvent,
}

/// Assets a page needs to display the annotated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachments {
    /// Libraries to load
    pub library: Vec<String>,
    /// Settings passed to the libraries
    pub settings: ClientSettings,
}

impl Attachments {
    fn tooltips(trigger_event: TriggerEvent) -> Self {
        Self {
            library: vec![TOOLTIP_LIBRARY.to_string()],
            settings: ClientSettings { trigger_event },
        }
    }
}

/// Output of one filter run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    /// Filtered text
    pub text: String,
    /// Assets to attach, absent when the filter is disabled
    pub attachments: Option<Attachments>,
    /// Match statistics
    pub stats: AnnotationStats,
}

/// Filter replacing glossary terms with tooltips
#[derive(Debug, Clone)]
pub struct TooltipFilter<R = TooltipTemplate> {
    settings: FilterSettings,
    store: Arc<GlossaryStore>,
    policy: DescriptionPolicy,
    limits: Limits,
    renderer: R,
}

impl TooltipFilter<TooltipTemplate> {
    /// Create a filter rendering with the default template
    pub fn new(settings: FilterSettings, store: impl Into<Arc<GlossaryStore>>) -> Self {
        Self::with_renderer(settings, store, TooltipTemplate::default())
    }
}

impl<R: Render> TooltipFilter<R> {
    /// Create a filter with a custom renderer
    pub fn with_renderer(
        settings: FilterSettings,
        store: impl Into<Arc<GlossaryStore>>,
        renderer: R,
    ) -> Self {
        Self {
            settings,
            store: store.into(),
            policy: DescriptionPolicy::default(),
            limits: Limits::default(),
            renderer,
        }
    }

    /// Replace the description truncation policy
    pub fn with_policy(mut self, policy: DescriptionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bound the input and glossary sizes
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Current settings
    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// One-line description of the filter
    pub fn tips(&self) -> &'static str {
        FILTER_TIPS
    }

    /// Build the index for the configured vocabulary and `langcode`
    ///
    /// Returns `None` when no vocabulary is configured or the store lacks it.
    pub fn index_for(&self, langcode: Option<&str>) -> Option<GlossaryIndex> {
        let id = self.settings.vocabulary()?;
        let vocabulary = self.store.vocabulary(id)?;

        Some(GlossaryIndex::build_with_policy(
            vocabulary.terms_for(langcode).cloned(),
            &self.policy,
        ))
    }

    /// Resolve the vocabulary and compile it for `langcode`
    pub fn prepare(&self, langcode: Option<&str>) -> Result<PreparedFilter<'_, R>> {
        let Some(id) = self.settings.vocabulary() else {
            tracing::debug!("no vocabulary configured, filter disabled");
            return Ok(self.prepared(Mode::Disabled));
        };

        let Some(index) = self.index_for(langcode) else {
            tracing::warn!(vocabulary = id, "vocabulary not found in glossary, filter disabled");
            return Ok(self.prepared(Mode::Disabled));
        };

        if !self.settings.automatic {
            return Ok(self.prepared(Mode::Manual));
        }

        let engine = AnnotationEngine::with_limits(index, self.limits)?;
        Ok(self.prepared(Mode::Automatic(engine)))
    }

    /// Filter one text
    pub fn process(&self, text: &str, langcode: Option<&str>) -> Result<FilterResult> {
        self.prepare(langcode)?.apply(text)
    }

    fn prepared(&self, mode: Mode) -> PreparedFilter<'_, R> {
        PreparedFilter {
            filter: self,
            config: self.settings.exclusion_config(),
            mode,
        }
    }
}

#[derive(Debug)]
enum Mode {
    Disabled,
    Manual,
    Automatic(AnnotationEngine),
}

/// A filter compiled for one language
#[derive(Debug)]
pub struct PreparedFilter<'f, R> {
    filter: &'f TooltipFilter<R>,
    config: ExclusionConfig,
    mode: Mode,
}

impl<R: Render> PreparedFilter<'_, R> {
    /// Whether texts will be annotated
    pub fn is_automatic(&self) -> bool {
        matches!(self.mode, Mode::Automatic(_))
    }

    /// Compiled engine, when annotating automatically
    pub fn engine(&self) -> Option<&AnnotationEngine> {
        match &self.mode {
            Mode::Automatic(engine) => Some(engine),
            _ => None,
        }
    }

    /// Exclusion configuration applied to every text
    pub fn exclusion_config(&self) -> &ExclusionConfig {
        &self.config
    }

    /// Filter one text
    pub fn apply(&self, text: &str) -> Result<FilterResult> {
        let annotated = match &self.mode {
            Mode::Disabled => {
                return Ok(FilterResult {
                    text: text.to_string(),
                    attachments: None,
                    stats: AnnotationStats::default(),
                })
            }
            Mode::Manual => Annotated::unchanged(text),
            Mode::Automatic(engine) => engine.annotate(text, &self.config, &self.filter.renderer)?,
        };

        Ok(self.finish(annotated))
    }

    /// Filter many texts, in parallel when the `parallel` feature is enabled
    pub fn apply_batch<S>(&self, texts: &[S]) -> Result<Vec<FilterResult>>
    where
        S: AsRef<str> + Sync,
        R: Sync,
    {
        match &self.mode {
            Mode::Automatic(engine) => {
                let annotated = crate::batch::annotate_batch(
                    engine,
                    texts,
                    &self.config,
                    &self.filter.renderer,
                    &crate::batch::BatchOptions::default(),
                )?;
                Ok(annotated.into_iter().map(|a| self.finish(a)).collect())
            }
            _ => texts.iter().map(|text| self.apply(text.as_ref())).collect(),
        }
    }

    fn finish(&self, annotated: Annotated) -> FilterResult {
        FilterResult {
            text: annotated.text,
            attachments: Some(Attachments::tooltips(self.filter.settings.trigger_event)),
            stats: annotated.stats,
        }
    }
}
