//! Glossary tooltips for rendered HTML
//!
//! This crate finds glossary terms in an HTML fragment and wraps each
//! occurrence in tooltip markup carrying the term's description. Matching is
//! case-insensitive, keeps the case of the source text, never touches text
//! inside links or configured tags, and can be capped per term.
//!
//! # Architecture
//!
//! - **Glossary**: raw terms are normalized into an ordered [`GlossaryIndex`];
//!   vocabularies are loaded from TOML or JSON through [`GlossaryStore`]
//! - **Engine**: [`AnnotationEngine`] compiles an index once and annotates any
//!   number of texts, guarded by a [`MarkupGuard`](markup::MarkupGuard) scan
//! - **Rendering**: the [`Render`] trait turns a match into markup
//! - **Filter**: [`TooltipFilter`] applies settings and vocabulary selection
//!
//! # Example
//!
//! ```rust
//! use glosstip_core::{
//!     AnnotationEngine, ExclusionConfig, GlossaryIndex, OccurrenceLimit, RawTerm,
//!     TooltipTemplate,
//! };
//!
//! let index = GlossaryIndex::build([
//!     RawTerm::new("milk powder", "Milk dried to a powder.", "12"),
//!     RawTerm::new("milk", "A white liquid.", "7"),
//! ]);
//! let engine = AnnotationEngine::new(index).unwrap();
//!
//! let config = ExclusionConfig::new()
//!     .with_excluded_tags(["h1"])
//!     .with_limit(OccurrenceLimit::AtMost(1));
//!
//! let html = "<h1>Milk</h1><p>Milk is not milk powder.</p>";
//! let result = engine.annotate(html, &config, &TooltipTemplate::default()).unwrap();
//!
//! assert!(result.text.starts_with("<h1>Milk</h1><p><span class=\"glosstip\""));
//! assert_eq!(result.stats.annotated, 2);
//! assert_eq!(result.stats.guarded, 1);
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod glossary;
pub mod markup;
pub mod render;
pub mod tracker;

pub use batch::{annotate_batch, BatchOptions};
pub use config::{FilterSettings, TriggerEvent};
pub use engine::{
    annotate, Action, Annotated, AnnotationEngine, AnnotationStats, ExclusionConfig, Limits,
    MatchDecision, PassthroughReason,
};
pub use error::{GlossError, Result};
pub use filter::{Attachments, FilterResult, PreparedFilter, TooltipFilter, TOOLTIP_LIBRARY};
pub use glossary::{
    DescriptionPolicy, GlossaryEntry, GlossaryFormat, GlossaryIndex, GlossaryStore, RawTerm,
    Vocabulary,
};
pub use markup::GuardScope;
pub use render::{Render, RenderError, TooltipTemplate, BROKEN_TOOLTIP};
pub use tracker::{OccurrenceLimit, OccurrenceTracker};
