//! Which corpus variant(s) a query is searched against.
//!
//! Two stages: [`DiacriticDetector`] classifies the raw query, then
//! [`CorpusSelector`] turns that classification into an ordered search plan.

use crate::normalize::has_diacritics;
use serde::{Deserialize, Serialize};

/// Text variant of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusVariant {
    /// Plain/clean rendering without harakat
    Plain,
    /// Canonical Uthmani rendering with harakat and recitation marks
    Diacritic,
}

/// How the user typed the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScript {
    Vocalized,
    Bare,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiacriticDetector;

impl DiacriticDetector {
    /// Classify the raw, pre-normalization query text
    pub fn detect(&self, raw_query: &str) -> QueryScript {
        if has_diacritics(raw_query) {
            QueryScript::Vocalized
        } else {
            QueryScript::Bare
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusSelector;

impl CorpusSelector {
    /// Variants to try in order; the first one with matches wins.
    ///
    /// A bare query never touches the diacritic corpus.
    pub fn plan(&self, script: QueryScript, diacritic_available: bool) -> &'static [CorpusVariant] {
        match (script, diacritic_available) {
            (QueryScript::Vocalized, true) => &[CorpusVariant::Diacritic, CorpusVariant::Plain],
            (QueryScript::Vocalized, false) | (QueryScript::Bare, _) => &[CorpusVariant::Plain],
        }
    }
}
