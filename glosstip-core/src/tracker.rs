//! Per-call occurrence accounting
//!
//! A fresh [`OccurrenceTracker`] is created for every annotation call and
//! dropped when the call returns, so counts never leak between documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GlossError;

/// Maximum number of annotations per distinct term within one call
///
/// Serialized as the integer form used by settings files: `-1` is unlimited,
/// `0` never annotates, and `N > 0` caps at `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OccurrenceLimit {
    /// Annotate every occurrence
    #[default]
    Unlimited,
    /// Annotate at most this many occurrences of each term
    AtMost(u32),
}

impl OccurrenceLimit {
    /// Whether one more annotation is allowed after `count` annotations
    pub fn allows(&self, count: u32) -> bool {
        match self {
            OccurrenceLimit::Unlimited => true,
            OccurrenceLimit::AtMost(limit) => count < *limit,
        }
    }
}

impl TryFrom<i64> for OccurrenceLimit {
    type Error = GlossError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(OccurrenceLimit::Unlimited),
            n if n >= 0 => u32::try_from(n).map(OccurrenceLimit::AtMost).map_err(|_| {
                GlossError::Configuration(format!("occurrence limit {n} is out of range"))
            }),
            n => Err(GlossError::Configuration(format!(
                "occurrence limit must be -1 or greater, got {n}"
            ))),
        }
    }
}

impl From<OccurrenceLimit> for i64 {
    fn from(limit: OccurrenceLimit) -> Self {
        match limit {
            OccurrenceLimit::Unlimited => -1,
            OccurrenceLimit::AtMost(n) => i64::from(n),
        }
    }
}

/// Count of annotations applied so far, keyed by normalized term
#[derive(Debug, Default, Clone)]
pub struct OccurrenceTracker {
    counts: HashMap<String, u32>,
}

impl OccurrenceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations recorded for `key` (0 if never seen)
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Record one annotation of `key` if `limit` still allows it
    ///
    /// Returns `false` and leaves the count untouched once the cap is reached.
    pub fn try_record(&mut self, key: &str, limit: OccurrenceLimit) -> bool {
        let current = self.count(key);
        if !limit.allows(current) {
            return false;
        }

        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        true
    }

    /// Number of distinct terms annotated at least once
    pub fn distinct_terms(&self) -> usize {
        self.counts.len()
    }

    /// Iterate over (key, count) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }
}
