//! "chapter:verse" reference parsing, so a search box can double as navigation

use crate::corpus::Corpus;
use crate::normalize::{normalize, strip_chapter_prefix};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Highest chapter number accepted by the numeric form
pub const CHAPTER_COUNT: u32 = 114;

const DEFINITE_ARTICLE: &str = "ال";

/// Filler words dropped before matching ("آية", "سورة"), after alif unification
const FILLER_WORDS: &[&str] = &["اية", "سورة"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRef {
    pub chapter: u32,
    pub verse: u32,
}

/// Normalized chapter name -> chapter number.
///
/// Each chapter is indexed under its full name and, when it starts with the
/// definite article, under the name without it.
#[derive(Debug, Clone, Default)]
pub struct ChapterNameIndex {
    names: HashMap<String, u32>,
}

impl ChapterNameIndex {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self::from_names(corpus.chapters().iter().map(|(n, name)| (*n, name.as_str())))
    }

    pub fn from_names<'a>(chapters: impl IntoIterator<Item = (u32, &'a str)>) -> Self {
        let mut names = HashMap::new();
        for (number, name) in chapters {
            let full = strip_chapter_prefix(&normalize(name)).to_string();
            if full.is_empty() {
                continue;
            }
            if let Some(bare) = full.strip_prefix(DEFINITE_ARTICLE) {
                let bare = bare.trim();
                if !bare.is_empty() {
                    names.insert(bare.to_string(), number);
                }
            }
            names.insert(full, number);
        }
        Self { names }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([^\d\s:]+(?:\s+[^\d\s:]+)*)\s*[:\s]\s*(\d+)\s*$")
            .expect("static name reference pattern")
    })
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*[:\s]\s*(\d+)\s*$").expect("static number reference pattern")
    })
}

/// Map Arabic-Indic digits to ASCII so both numeral systems parse
fn ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            _ => c,
        })
        .collect()
}

/// Recognize "<chapter name> <verse>" or "<chapter>:<verse>" queries.
///
/// Verse numbers are not range-checked against the chapter; a lookup of an
/// out-of-range reference simply finds nothing.
pub fn try_parse_reference(query: &str, index: &ChapterNameIndex) -> Option<VerseRef> {
    let mut cleaned = ascii_digits(&normalize(query));
    for filler in FILLER_WORDS {
        cleaned = cleaned.replace(filler, "");
    }

    if let Some(caps) = name_pattern().captures(&cleaned) {
        let name = normalize(&caps[1]);
        if let (Some(chapter), Ok(verse)) = (index.get(&name), caps[2].parse::<u32>()) {
            return Some(VerseRef { chapter, verse });
        }
    }

    if let Some(caps) = number_pattern().captures(&cleaned) {
        let chapter = caps[1].parse::<u32>().ok()?;
        let verse = caps[2].parse::<u32>().ok()?;
        if (1..=CHAPTER_COUNT).contains(&chapter) && verse > 0 {
            return Some(VerseRef { chapter, verse });
        }
    }

    None
}
