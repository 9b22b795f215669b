//! Annotating many documents with one compiled engine

use crate::engine::{Annotated, AnnotationEngine, ExclusionConfig};
#[cfg(feature = "parallel")]
use crate::error::GlossError;
use crate::error::Result;
use crate::render::Render;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Batch execution options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; `None` uses rayon's global pool
    pub threads: Option<usize>,
}

impl BatchOptions {
    /// Run on a dedicated pool of `threads` workers
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
        }
    }
}

/// Annotate `documents`, returning results in input order
///
/// Every document gets its own occurrence tracker. The first error aborts the
/// batch.
#[cfg(feature = "parallel")]
pub fn annotate_batch<R, S>(
    engine: &AnnotationEngine,
    documents: &[S],
    config: &ExclusionConfig,
    renderer: &R,
    options: &BatchOptions,
) -> Result<Vec<Annotated>>
where
    R: Render + Sync + ?Sized,
    S: AsRef<str> + Sync,
{
    let run = || {
        documents
            .par_iter()
            .map(|doc| engine.annotate(doc.as_ref(), config, renderer))
            .collect::<Result<Vec<_>>>()
    };

    match options.threads {
        Some(threads) => {
            if threads == 0 {
                return Err(GlossError::Configuration(
                    "threads must be greater than 0".into(),
                ));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| GlossError::Configuration(e.to_string()))?;
            tracing::debug!(documents = documents.len(), threads, "annotating batch");
            pool.install(run)
        }
        None => run(),
    }
}

/// Annotate `documents`, returning results in input order
///
/// Every document gets its own occurrence tracker. The first error aborts the
/// batch.
#[cfg(not(feature = "parallel"))]
pub fn annotate_batch<R, S>(
    engine: &AnnotationEngine,
    documents: &[S],
    config: &ExclusionConfig,
    renderer: &R,
    _options: &BatchOptions,
) -> Result<Vec<Annotated>>
where
    R: Render + Sync + ?Sized,
    S: AsRef<str> + Sync,
{
    documents
        .iter()
        .map(|doc| engine.annotate(doc.as_ref(), config, renderer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::{GlossaryIndex, RawTerm};
    use crate::render::{RenderError, TooltipTemplate};
    use crate::tracker::OccurrenceLimit;

    fn engine() -> AnnotationEngine {
        AnnotationEngine::new(GlossaryIndex::build([RawTerm::new("milk", "A liquid.", "1")]))
            .unwrap()
    }

    #[test]
    fn test_trackers_are_per_document() {
        let config = ExclusionConfig::new().with_limit(OccurrenceLimit::AtMost(1));
        let documents = vec!["milk milk".to_string(); 8];
        let upper = |title: &str, _: &str| -> std::result::Result<String, RenderError> {
            Ok(title.to_uppercase())
        };

        let results =
            annotate_batch(&engine(), &documents, &config, &upper, &BatchOptions::default())
                .unwrap();

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.text == "MILK milk"));
    }

    #[test]
    fn test_dedicated_pool_keeps_order() {
        let documents: Vec<String> = (0..20).map(|i| format!("{i} milk")).collect();
        let results = annotate_batch(
            &engine(),
            &documents,
            &ExclusionConfig::new(),
            &TooltipTemplate::default(),
            &BatchOptions::with_threads(2),
        )
        .unwrap();

        for (i, result) in results.iter().enumerate() {
            assert!(result.text.starts_with(&format!("{i} <span")));
        }
    }

    #[test]
    fn test_error_aborts_batch() {
        let failing = |_: &str, _: &str| -> std::result::Result<String, RenderError> {
            Err(RenderError::new("boom"))
        };
        let result = annotate_batch(
            &engine(),
            &["plain", "milk"],
            &ExclusionConfig::new(),
            &failing,
            &BatchOptions::default(),
        );
        assert!(result.is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_zero_threads_rejected() {
        let result = annotate_batch(
            &engine(),
            &["milk"],
            &ExclusionConfig::new(),
            &TooltipTemplate::default(),
            &BatchOptions::with_threads(0),
        );
        assert!(matches!(result, Err(GlossError::Configuration(_))));
    }
}
