//! Glossary terms: raw source data, the ordered index and file-backed stores

pub mod index;
pub mod store;

pub use index::{
    normalize_key, DescriptionPolicy, GlossaryEntry, GlossaryIndex, RawTerm,
    DEFAULT_MAX_DESCRIPTION_CHARS,
};
pub use store::{GlossaryFormat, GlossaryStore, Vocabulary};
