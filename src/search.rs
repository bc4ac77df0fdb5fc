//! Verse search over in-memory corpora
//!
//! Queries are either bare words (every word must appear as a substring of
//! the normalized verse) or a double-quoted phrase (one contiguous substring).
//! Results always come back in corpus order, projected onto the plain corpus.

use crate::corpus::{Corpus, Verse, Vocabulary};
use crate::distance::closest_word;
use crate::normalize::normalize;
use crate::reference::{try_parse_reference, ChapterNameIndex, VerseRef};
use crate::routing::{CorpusSelector, CorpusVariant, DiacriticDetector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Implicit AND over whitespace-separated words
    Words,
    /// Exact contiguous phrase, from a fully quoted query
    Phrase,
}

/// A query after quote detection and normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub mode: QueryMode,
    /// Raw query content with any surrounding quotes removed
    pub content: String,
    /// Normalized, non-empty words
    pub words: Vec<String>,
}

impl ParsedQuery {
    /// Returns `None` when nothing searchable is left.
    ///
    /// An opening quote without a closing one is ordinary word content.
    pub fn parse(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        let is_phrase = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
        let (mode, content) = if is_phrase {
            (QueryMode::Phrase, &trimmed[1..trimmed.len() - 1])
        } else {
            (QueryMode::Words, trimmed)
        };

        let words: Vec<String> = content
            .split_whitespace()
            .map(normalize)
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return None;
        }

        Some(Self {
            mode,
            content: content.to_string(),
            words,
        })
    }

    /// Whether a verse's normalized text satisfies this query
    pub fn matches(&self, normalized_text: &str) -> bool {
        match self.mode {
            QueryMode::Phrase => normalized_text.contains(&self.words.join(" ")),
            QueryMode::Words => self.words.iter().all(|w| normalized_text.contains(w.as_str())),
        }
    }
}

/// Outcome of a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub query: String,
    pub verses: Vec<Verse>,
    /// Corpus variant that produced the matches
    pub variant: CorpusVariant,
    /// Set when the query was replaced by a spelling correction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
}

impl MatchResult {
    fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            verses: Vec::new(),
            variant: CorpusVariant::Plain,
            corrected_query: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// The query the verses actually matched
    pub fn effective_query(&self) -> &str {
        self.corrected_query.as_deref().unwrap_or(&self.query)
    }
}

/// Global numbers of the verses in `corpus` matching `parsed`
pub fn matching_numbers(corpus: &Corpus, parsed: &ParsedQuery) -> HashSet<u32> {
    corpus
        .verses()
        .iter()
        .filter(|v| parsed.matches(&normalize(&v.text)))
        .map(|v| v.global_number)
        .collect()
}

/// Search engine over a plain corpus and an optional diacritic-bearing one
pub struct SearchEngine {
    plain: Arc<Corpus>,
    diacritic: Option<Arc<Corpus>>,
    vocabulary: Arc<Vocabulary>,
    chapter_index: ChapterNameIndex,
    detector: DiacriticDetector,
    selector: CorpusSelector,
}

impl SearchEngine {
    /// Builds the correction vocabulary from the plain corpus
    pub fn new(plain: Arc<Corpus>, diacritic: Option<Arc<Corpus>>) -> Self {
        let vocabulary = Arc::new(Vocabulary::from_corpus(&plain));
        Self::with_vocabulary(plain, diacritic, vocabulary)
    }

    pub fn with_vocabulary(
        plain: Arc<Corpus>,
        diacritic: Option<Arc<Corpus>>,
        vocabulary: Arc<Vocabulary>,
    ) -> Self {
        let chapter_index = ChapterNameIndex::from_corpus(&plain);
        tracing::debug!(
            verses = plain.len(),
            vocabulary = vocabulary.len(),
            chapters = chapter_index.len(),
            has_diacritic = diacritic.is_some(),
            "search engine ready"
        );
        Self {
            plain,
            diacritic,
            vocabulary,
            chapter_index,
            detector: DiacriticDetector,
            selector: CorpusSelector,
        }
    }

    pub fn plain(&self) -> &Corpus {
        &self.plain
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn chapter_index(&self) -> &ChapterNameIndex {
        &self.chapter_index
    }

    fn corpus_for(&self, variant: CorpusVariant) -> Option<&Corpus> {
        match variant {
            CorpusVariant::Plain => Some(&self.plain),
            CorpusVariant::Diacritic => self.diacritic.as_deref(),
        }
    }

    /// Search, falling back to a single-word spelling correction when nothing matches
    pub fn search(&self, query: &str) -> MatchResult {
        let initial = self.search_exact(query);
        if !initial.is_empty() || !self.allows_correction(query) {
            return initial;
        }

        let Some(correction) = closest_word(query, &self.vocabulary) else {
            return initial;
        };

        let corrected = self.search_exact(&correction.word);
        if corrected.is_empty() {
            tracing::debug!(query, candidate = %correction.word, "correction found nothing");
            return initial;
        }

        tracing::debug!(
            query,
            corrected = %correction.word,
            distance = correction.distance,
            hits = corrected.len(),
            "applied spelling correction"
        );
        MatchResult {
            query: query.to_string(),
            corrected_query: Some(correction.word),
            ..corrected
        }
    }

    /// Correction only applies to a single unquoted word
    fn allows_correction(&self, query: &str) -> bool {
        let trimmed = query.trim();
        !normalize(trimmed).is_empty()
            && !trimmed.contains(char::is_whitespace)
            && !trimmed.starts_with('"')
            && !self.vocabulary.is_empty()
    }

    /// Search without spelling correction
    pub fn search_exact(&self, query: &str) -> MatchResult {
        let Some(parsed) = ParsedQuery::parse(query) else {
            return MatchResult::empty(query);
        };

        let script = self.detector.detect(&parsed.content);
        let plan = self.selector.plan(script, self.diacritic.is_some());

        for &variant in plan {
            let Some(corpus) = self.corpus_for(variant) else {
                continue;
            };
            let numbers = matching_numbers(corpus, &parsed);
            if !numbers.is_empty() {
                return MatchResult {
                    query: query.to_string(),
                    verses: self.plain.project(&numbers),
                    variant,
                    corrected_query: None,
                };
            }
        }

        MatchResult::empty(query)
    }

    /// Every verse numbered `verse_number` within its chapter
    pub fn search_by_verse_number(&self, verse_number: u32) -> Vec<Verse> {
        self.plain.verses_numbered(verse_number)
    }

    pub fn parse_reference(&self, query: &str) -> Option<VerseRef> {
        try_parse_reference(query, &self.chapter_index)
    }

    /// Verse a reference query points at, if it parses and exists
    pub fn resolve_reference(&self, query: &str) -> Option<&Verse> {
        let reference = self.parse_reference(query)?;
        self.plain.verse(reference.chapter, reference.verse)
    }
}
