//! Post-processing of a result set: neighbor-word suggestions, recurring
//! phrase filters and occurrence bookkeeping for the results view.

use crate::corpus::Verse;
use crate::normalize::{normalize, split_words};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Maximum number of neighbor suggestions returned
pub const MAX_NEIGHBORS: usize = 30;

/// Queries longer than this get no neighbor suggestions
pub const MAX_NEIGHBOR_QUERY_WORDS: usize = 6;

/// Extra words allowed between the first and last query word of a phrase candidate
pub const PHRASE_SPAN_SLACK: usize = 3;

/// Non-literal phrase filters kept alongside the literal query
pub const MAX_PHRASE_FILTERS: usize = 9;

/// A recurring phrasing and the number of results containing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseFilter {
    pub phrase: String,
    pub count: usize,
}

/// Position of one query occurrence inside a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Index into the result list
    pub result_index: usize,
    /// Index of the first matched word inside that verse
    pub word_index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceCounts {
    /// Substring hits of any query word
    pub general: usize,
    /// Whole-word hits of any query word
    pub exact: usize,
}

/// Normalized, non-empty query words with double quotes removed
pub fn query_words(query: &str) -> Vec<String> {
    query
        .replace('"', "")
        .split_whitespace()
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Insertion-ordered frequency table
#[derive(Default)]
struct Frequencies {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Frequencies {
    fn add(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(word.to_string(), 1);
                self.order.push(word.to_string());
            }
        }
    }

    /// Words by descending count; ties keep first-seen order
    fn ranked(self) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .order
            .into_iter()
            .map(|w| {
                let count = self.counts.get(&w).copied().unwrap_or(0);
                (w, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Words found right before and right after each occurrence of the query
/// as a contiguous word run, most frequent first.
///
/// Query words themselves and single-letter tokens are never suggested.
pub fn find_neighbors(results: &[Verse], query: &str) -> Vec<String> {
    let words = query_words(query);
    if words.is_empty() || words.len() > MAX_NEIGHBOR_QUERY_WORDS {
        return Vec::new();
    }

    let mut freq = Frequencies::default();
    let mut add_neighbor = |neighbor: &str| {
        if neighbor.chars().count() > 1 && !words.iter().any(|w| w == neighbor) {
            freq.add(neighbor);
        }
    };

    for verse in results {
        let text = normalize(&verse.text);
        let verse_words = split_words(&text);
        if verse_words.len() < words.len() {
            continue;
        }

        for start in 0..=verse_words.len() - words.len() {
            let end = start + words.len();
            if verse_words[start..end].iter().zip(&words).any(|(a, b)| *a != b.as_str()) {
                continue;
            }
            if start > 0 {
                add_neighbor(verse_words[start - 1]);
            }
            if end < verse_words.len() {
                add_neighbor(verse_words[end]);
            }
        }
    }

    freq.ranked()
        .into_iter()
        .take(MAX_NEIGHBORS)
        .map(|(word, _)| word)
        .collect()
}

fn by_count_then_length(a: &PhraseFilter, b: &PhraseFilter) -> std::cmp::Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.phrase.chars().count().cmp(&b.phrase.chars().count()))
}

/// Recurring phrasings around a multi-word query, for narrowing results.
///
/// The literal query (words joined by one space) is always present.
/// Queries of fewer than two words yield nothing.
pub fn find_phrase_filters(results: &[Verse], query_words: &[String]) -> Vec<PhraseFilter> {
    if query_words.len() < 2 {
        return Vec::new();
    }

    let texts: Vec<String> = results.iter().map(|v| normalize(&v.text)).collect();
    let literal = query_words.join(" ");

    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();
    for text in &texts {
        let verse_words = split_words(text);
        let hits: Vec<usize> = verse_words
            .iter()
            .enumerate()
            .filter(|(_, w)| query_words.iter().any(|q| q.as_str() == **w))
            .map(|(i, _)| i)
            .collect();

        let (Some(&first), Some(&last)) = (hits.first(), hits.last()) else {
            continue;
        };
        if hits.len() >= query_words.len() && last - first < query_words.len() + PHRASE_SPAN_SLACK {
            let phrase = verse_words[first..=last].join(" ");
            if seen.insert(phrase.clone()) {
                candidates.push(phrase);
            }
        }
    }
    if seen.insert(literal.clone()) {
        candidates.push(literal.clone());
    }

    let count_of = |phrase: &str| texts.iter().filter(|t| t.contains(phrase)).count();

    let mut others: Vec<PhraseFilter> = Vec::new();
    let mut literal_filter = None;
    for phrase in candidates {
        let filter = PhraseFilter {
            count: count_of(&phrase),
            phrase,
        };
        if filter.phrase == literal {
            literal_filter = Some(filter);
        } else {
            others.push(filter);
        }
    }

    others.sort_by(by_count_then_length);
    others.truncate(MAX_PHRASE_FILTERS);

    let mut filters: Vec<PhraseFilter> = literal_filter.into_iter().collect();
    filters.extend(others);
    filters.sort_by(by_count_then_length);
    filters
}

/// Keep the results whose normalized text contains the selected phrase
pub fn apply_phrase_filter(results: &[Verse], phrase: &str) -> Vec<Verse> {
    results
        .iter()
        .filter(|v| normalize(&v.text).contains(phrase))
        .cloned()
        .collect()
}

/// Keep the results containing `word` as a whole word
pub fn filter_exact_word(results: &[Verse], word: &str) -> Vec<Verse> {
    let word = normalize(word);
    if word.is_empty() {
        return results.to_vec();
    }
    results
        .iter()
        .filter(|v| normalize(&v.text).split_whitespace().any(|w| w == word))
        .cloned()
        .collect()
}

/// Every contiguous occurrence of the query words, in result order
pub fn find_occurrences(results: &[Verse], query: &str) -> Vec<Occurrence> {
    let words = query_words(query);
    if words.is_empty() {
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    for (result_index, verse) in results.iter().enumerate() {
        let text = normalize(&verse.text);
        let verse_words = split_words(&text);
        if verse_words.len() < words.len() {
            continue;
        }
        for word_index in 0..=verse_words.len() - words.len() {
            let run = &verse_words[word_index..word_index + words.len()];
            if run.iter().zip(&words).all(|(a, b)| *a == b.as_str()) {
                occurrences.push(Occurrence {
                    result_index,
                    word_index,
                });
            }
        }
    }
    occurrences
}

/// Total hits of the query words across the results
pub fn count_occurrences(results: &[Verse], query_words: &[String]) -> OccurrenceCounts {
    let mut counts = OccurrenceCounts::default();
    for verse in results {
        let text = normalize(&verse.text);
        for word in query_words.iter().filter(|w| !w.is_empty()) {
            counts.general += text.matches(word.as_str()).count();
        }
        counts.exact += text
            .split_whitespace()
            .filter(|w| query_words.iter().any(|q| q == w))
            .count();
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verses(texts: &[&str]) -> Vec<Verse> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Verse {
                global_number: i as u32 + 1,
                chapter_number: 1,
                verse_number: i as u32 + 1,
                text: t.to_string(),
                chapter_name: "سورة".to_string(),
            })
            .collect()
    }

    #[test]
    fn neighbors_ranked_by_frequency() {
        let results = verses(&[
            "والله غفور رحيم",
            "والله غفور رحيم",
            "ان الله غفور رحيم",
            "والله عليم حكيم",
        ]);
        let neighbors = find_neighbors(&results, "غفور");
        assert_eq!(neighbors, vec!["رحيم", "والله", "الله"]);
    }

    #[test]
    fn neighbors_exclude_query_and_single_letters() {
        let results = verses(&["الله لا اله الا هو", "و الله الله ربكم"]);
        let neighbors = find_neighbors(&results, "الله");
        assert!(!neighbors.contains(&"الله".to_string()));
        assert!(!neighbors.contains(&"و".to_string()));
        assert_eq!(neighbors, vec!["لا", "ربكم"]);
    }

    #[test]
    fn neighbors_match_whole_word_runs() {
        let results = verses(&["قل هو الله احد", "الله الصمد"]);
        // "هو الله" as a run: neighbors are "قل" and "احد"
        assert_eq!(find_neighbors(&results, "هو الله"), vec!["قل", "احد"]);
        // substring of a word is not an occurrence
        assert!(find_neighbors(&results, "صمد").is_empty());
    }

    #[test]
    fn neighbors_limits() {
        let results = verses(&["a b c d e f g h"]);
        assert!(find_neighbors(&results, "a b c d e f g").is_empty());
        assert!(find_neighbors(&results, "").is_empty());

        let long: Vec<String> = (0..40).map(|i| format!("كلمة{i} هدى")).collect();
        let refs: Vec<&str> = long.iter().map(String::as_str).collect();
        assert_eq!(find_neighbors(&verses(&refs), "هدى").len(), MAX_NEIGHBORS);
    }

    #[test]
    fn phrase_filters_always_include_literal() {
        let words = query_words("رب العالمين");
        let results = verses(&["الحمد لله رب العالمين", "رب السماوات والارض ورب العالمين"]);
        let filters = find_phrase_filters(&results, &words);
        assert!(filters.iter().any(|f| f.phrase == "رب العالمين"));
    }

    #[test]
    fn phrase_filters_literal_kept_even_when_unextractable() {
        let words = query_words("السماوات العلى");
        // the words never co-occur, so no span is extracted
        let results = verses(&["خلق السماوات", "الاسماء الحسنى العلى"]);
        let filters = find_phrase_filters(&results, &words);
        assert_eq!(
            filters,
            vec![PhraseFilter {
                phrase: "السماوات العلى".to_string(),
                count: 0
            }]
        );
    }

    #[test]
    fn phrase_filters_sorted_by_count_then_length() {
        let words = query_words("الله غفور");
        let results = verses(&[
            "ان الله غفور رحيم",
            "والله غفور رحيم",
            "الله كان غفور رحيما",
            "الله سميع عليم غفور",
        ]);
        let filters = find_phrase_filters(&results, &words);
        assert_eq!(
            filters,
            vec![
                PhraseFilter { phrase: "الله غفور".to_string(), count: 2 },
                PhraseFilter { phrase: "الله كان غفور".to_string(), count: 1 },
                PhraseFilter { phrase: "الله سميع عليم غفور".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn phrase_span_slack_is_pinned() {
        let words = query_words("قال رب");
        // span of 5 (4 apart) is within 2 + 3
        let near = verses(&["قال a b c رب"]);
        assert!(find_phrase_filters(&near, &words).iter().any(|f| f.phrase == "قال a b c رب"));
        // span of 6 (5 apart) is not
        let far = verses(&["قال a b c d رب"]);
        assert_eq!(find_phrase_filters(&far, &words).len(), 1);
    }

    #[test]
    fn phrase_filters_keep_top_nine_plus_literal() {
        let words = query_words("x y");
        let texts: Vec<String> = (0..12).map(|i| format!("x w{i} y")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let filters = find_phrase_filters(&verses(&refs), &words);
        assert_eq!(filters.len(), MAX_PHRASE_FILTERS + 1);
        assert!(filters.iter().any(|f| f.phrase == "x y"));
    }

    #[test]
    fn single_word_has_no_phrase_filters() {
        let results = verses(&["الحمد لله"]);
        assert!(find_phrase_filters(&results, &query_words("الحمد")).is_empty());
    }

    #[test]
    fn exact_word_filter() {
        let results = verses(&["ذلك الكتاب", "كتاب مبين", "كتابا"]);
        let kept: Vec<u32> = filter_exact_word(&results, "كتاب")
            .iter()
            .map(|v| v.global_number)
            .collect();
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn phrase_filter_application() {
        let results = verses(&["رب العالمين", "رب المشرقين"]);
        assert_eq!(apply_phrase_filter(&results, "رب العالمين").len(), 1);
    }

    #[test]
    fn occurrences_positions() {
        let results = verses(&["الله لا اله الا الله", "قل هو الله"]);
        assert_eq!(
            find_occurrences(&results, "الله"),
            vec![
                Occurrence { result_index: 0, word_index: 0 },
                Occurrence { result_index: 0, word_index: 4 },
                Occurrence { result_index: 1, word_index: 2 },
            ]
        );
        assert_eq!(
            find_occurrences(&results, "\"هو الله\""),
            vec![Occurrence { result_index: 1, word_index: 1 }]
        );
    }

    #[test]
    fn occurrence_counts() {
        let results = verses(&["الكتاب كتاب", "كتابا"]);
        let counts = count_occurrences(&results, &query_words("كتاب"));
        assert_eq!(counts, OccurrenceCounts { general: 3, exact: 1 });
    }
}
