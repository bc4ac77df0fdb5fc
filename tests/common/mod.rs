//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use tadabbur_lib::{Corpus, SearchEngine, Verse};

const CHAPTER_NAMES: [(u32, &str); 3] = [
    (1, "سُورَةُ ٱلْفَاتِحَةِ"),
    (2, "سُورَةُ البَقَرَةِ"),
    (3, "سُورَةُ آلِ عِمۡرَانَ"),
];

/// (global, chapter, verse, plain text, uthmani text) with real global numbering
const VERSES: [(u32, u32, u32, &str, &str); 8] = [
    (1, 1, 1, "بسم الله الرحمن الرحيم", "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ"),
    (2, 1, 2, "الحمد لله رب العالمين", "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ"),
    (3, 1, 3, "الرحمن الرحيم", "ٱلرَّحْمَٰنِ ٱلرَّحِيمِ"),
    (8, 2, 1, "الم", "الٓمٓ"),
    (
        9,
        2,
        2,
        "ذلك الكتاب لا ريب فيه هدى للمتقين",
        "ذَٰلِكَ ٱلْكِتَٰبُ لَا رَيْبَ ۛ فِيهِ ۛ هُدًى لِّلْمُتَّقِينَ",
    ),
    (
        262,
        2,
        255,
        "الله لا اله الا هو الحي القيوم",
        "ٱللَّهُ لَآ إِلَٰهَ إِلَّا هُوَ ٱلْحَىُّ ٱلْقَيُّومُ",
    ),
    (294, 3, 1, "الم", "الٓمٓ"),
    (
        301,
        3,
        8,
        "ربنا لا تزغ قلوبنا بعد اذ هديتنا وهب لنا من لدنك رحمة انك انت الوهاب",
        "رَبَّنَا لَا تُزِغْ قُلُوبَنَا بَعْدَ إِذْ هَدَيْتَنَا وَهَبْ لَنَا مِن لَّدُنكَ رَحْمَةً ۚ إِنَّكَ أَنتَ ٱلْوَهَّابُ",
    ),
];

fn chapter_name(chapter: u32) -> String {
    CHAPTER_NAMES
        .iter()
        .find(|(n, _)| *n == chapter)
        .map(|(_, name)| name.to_string())
        .unwrap_or_default()
}

fn build(identifier: &str, uthmani: bool) -> Corpus {
    let verses = VERSES
        .iter()
        .map(|&(global, chapter, verse, plain, vocalized)| Verse {
            global_number: global,
            chapter_number: chapter,
            verse_number: verse,
            text: if uthmani { vocalized } else { plain }.to_string(),
            chapter_name: chapter_name(chapter),
        })
        .collect();
    Corpus::new(identifier, verses)
}

pub fn plain_corpus() -> Corpus {
    build("quran-simple-clean", false)
}

pub fn uthmani_corpus() -> Corpus {
    build("quran-uthmani", true)
}

/// Engine over both editions
pub fn engine() -> SearchEngine {
    SearchEngine::new(Arc::new(plain_corpus()), Some(Arc::new(uthmani_corpus())))
}

/// Engine without a diacritic edition
pub fn plain_engine() -> SearchEngine {
    SearchEngine::new(Arc::new(plain_corpus()), None)
}

/// Opening chapter numbered from 261, so 1:2 carries global number 262
pub fn offset_engine() -> SearchEngine {
    let verses = VERSES
        .iter()
        .filter(|(_, chapter, ..)| *chapter == 1)
        .map(|&(_, chapter, verse, plain, _)| Verse {
            global_number: 260 + verse,
            chapter_number: chapter,
            verse_number: verse,
            text: plain.to_string(),
            chapter_name: chapter_name(chapter),
        })
        .collect();
    SearchEngine::new(Arc::new(Corpus::new("offset", verses)), None)
}

pub fn globals(verses: &[Verse]) -> Vec<u32> {
    verses.iter().map(|v| v.global_number).collect()
}
