//! Verse corpus and vocabulary

use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One verse in a single edition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub global_number: u32,
    pub chapter_number: u32,
    pub verse_number: u32,
    pub text: String,
    pub chapter_name: String,
}

/// A chapter as delivered by an edition source, before flattening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub name: String,
    pub verses: Vec<ChapterVerse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterVerse {
    /// Global number when the source provides one
    pub global_number: Option<u32>,
    pub number_in_chapter: u32,
    pub text: String,
}

/// Ordered, read-only sequence of verses from one edition
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    identifier: String,
    verses: Vec<Verse>,
    by_global: HashMap<u32, usize>,
    by_position: HashMap<(u32, u32), usize>,
    chapters: Vec<(u32, String)>,
}

impl Corpus {
    /// Build from verses already in corpus order
    pub fn new(identifier: impl Into<String>, verses: Vec<Verse>) -> Self {
        let mut by_global = HashMap::with_capacity(verses.len());
        let mut by_position = HashMap::with_capacity(verses.len());
        let mut chapters: Vec<(u32, String)> = Vec::new();

        for (idx, verse) in verses.iter().enumerate() {
            by_global.insert(verse.global_number, idx);
            by_position.insert((verse.chapter_number, verse.verse_number), idx);
            if chapters.last().map(|(n, _)| *n) != Some(verse.chapter_number) {
                chapters.push((verse.chapter_number, verse.chapter_name.clone()));
            }
        }

        Self {
            identifier: identifier.into(),
            verses,
            by_global,
            by_position,
            chapters,
        }
    }

    /// Flatten chapters in chapter order. Verses without a source-provided
    /// global number get the running position in the concatenation.
    pub fn from_chapters(identifier: impl Into<String>, mut chapters: Vec<Chapter>) -> Self {
        chapters.sort_by_key(|c| c.number);

        let mut verses = Vec::new();
        let mut running: u32 = 0;
        for chapter in chapters {
            for verse in chapter.verses {
                running += 1;
                verses.push(Verse {
                    global_number: verse.global_number.unwrap_or(running),
                    chapter_number: chapter.number,
                    verse_number: verse.number_in_chapter,
                    text: verse.text,
                    chapter_name: chapter.name.clone(),
                });
            }
        }

        Self::new(identifier, verses)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn by_global_number(&self, global_number: u32) -> Option<&Verse> {
        self.by_global.get(&global_number).map(|&idx| &self.verses[idx])
    }

    /// Look up a verse by chapter and verse-in-chapter; out of range is `None`
    pub fn verse(&self, chapter: u32, verse: u32) -> Option<&Verse> {
        self.by_position.get(&(chapter, verse)).map(|&idx| &self.verses[idx])
    }

    /// `(chapter number, chapter name)` in corpus order
    pub fn chapters(&self) -> &[(u32, String)] {
        &self.chapters
    }

    /// Every verse whose number within its chapter equals `verse_number`
    pub fn verses_numbered(&self, verse_number: u32) -> Vec<Verse> {
        self.verses
            .iter()
            .filter(|v| v.verse_number == verse_number)
            .cloned()
            .collect()
    }

    /// Project a set of global numbers onto this corpus, in corpus order
    pub fn project(&self, global_numbers: &HashSet<u32>) -> Vec<Verse> {
        self.verses
            .iter()
            .filter(|v| global_numbers.contains(&v.global_number))
            .cloned()
            .collect()
    }
}

/// Distinct normalized words, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Collect every distinct normalized word of the corpus
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self::from_words(
            corpus
                .verses()
                .iter()
                .flat_map(|v| {
                    normalize(&v.text)
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                }),
        )
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for word in words {
            let word: String = word.into();
            if !word.is_empty() && seen.insert(word.clone()) {
                ordered.push(word);
            }
        }
        Self { words: ordered }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: u32, name: &str, texts: &[&str]) -> Chapter {
        Chapter {
            number,
            name: name.to_string(),
            verses: texts
                .iter()
                .enumerate()
                .map(|(i, t)| ChapterVerse {
                    global_number: None,
                    number_in_chapter: i as u32 + 1,
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn from_chapters_assigns_global_numbers_in_chapter_order() {
        let corpus = Corpus::from_chapters(
            "test",
            vec![
                chapter(2, "البقرة", &["الم", "ذلك الكتاب"]),
                chapter(1, "الفاتحة", &["بسم الله", "الحمد لله"]),
            ],
        );
        let numbers: Vec<u32> = corpus.verses().iter().map(|v| v.global_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(corpus.verse(2, 2).unwrap().text, "ذلك الكتاب");
        assert_eq!(corpus.by_global_number(3).unwrap().chapter_name, "البقرة");
        assert!(corpus.verse(2, 3).is_none());
        assert_eq!(
            corpus.chapters(),
            &[(1, "الفاتحة".to_string()), (2, "البقرة".to_string())]
        );
    }

    #[test]
    fn source_global_numbers_win() {
        let mut ch = chapter(1, "الفاتحة", &["الحمد لله"]);
        ch.verses[0].global_number = Some(262);
        let corpus = Corpus::from_chapters("test", vec![ch]);
        assert_eq!(corpus.verses()[0].global_number, 262);
    }

    #[test]
    fn verses_numbered_spans_chapters() {
        let corpus = Corpus::from_chapters(
            "test",
            vec![
                chapter(1, "الفاتحة", &["a", "b"]),
                chapter(2, "البقرة", &["c", "d", "e"]),
            ],
        );
        let texts: Vec<String> = corpus.verses_numbered(2).into_iter().map(|v| v.text).collect();
        assert_eq!(texts, vec!["b", "d"]);
    }

    #[test]
    fn vocabulary_is_normalized_and_distinct() {
        let corpus = Corpus::from_chapters(
            "test",
            vec![chapter(1, "الفاتحة", &["بِسْمِ ٱللَّهِ", "بسم  الله الرحمن"])],
        );
        let vocab = Vocabulary::from_corpus(&corpus);
        let words: Vec<&str> = vocab.iter().collect();
        assert_eq!(words, vec!["بسم", "الله", "الرحمن"]);
        assert!(vocab.contains("الرحمن"));
    }
}
