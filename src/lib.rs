//! Tadabbur - Quran text search
//!
//! Arabic normalization, word and phrase search over verse corpora, spelling
//! correction, reference parsing and result analysis.

// Normalization comes first as every other module compares through it
pub mod normalize;
pub mod distance;
pub mod corpus;
pub mod reference;
pub mod routing;
pub mod search;
pub mod analysis;
pub mod edition;
pub mod cache;
pub mod config;
pub mod error;
pub mod state;

pub use analysis::{
    apply_phrase_filter, count_occurrences, filter_exact_word, find_neighbors,
    find_occurrences, find_phrase_filters, query_words, Occurrence, OccurrenceCounts,
    PhraseFilter,
};
pub use cache::{CacheStats, CorpusCache};
pub use config::Config;
pub use corpus::{Chapter, ChapterVerse, Corpus, Verse, Vocabulary};
pub use distance::{closest_word, edit_distance, Correction};
pub use edition::EditionSource;
pub use error::TadabburError;
pub use normalize::{format_chapter_name, has_diacritics, normalize};
pub use reference::{try_parse_reference, ChapterNameIndex, VerseRef};
pub use routing::{CorpusSelector, CorpusVariant, DiacriticDetector, QueryScript};
pub use search::{MatchResult, ParsedQuery, QueryMode, SearchEngine};
pub use state::AppState;
