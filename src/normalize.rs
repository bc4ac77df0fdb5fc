//! Arabic text normalization
//!
//! Every comparison between two Arabic strings goes through [`normalize`]:
//! query words, verse text, chapter names and vocabulary entries alike.

const PLAIN_ALIF: char = 'ا';
const TATWEEL: char = '\u{0640}';

/// Leading "سورة" prefix carried by chapter names in most editions
const CHAPTER_PREFIX: &str = "سورة";

/// Normalize Arabic text for comparison: unifies alif variants, removes
/// diacritics, Quranic annotation marks and tatweel, then trims.
///
/// Alif maqsura (ى) is kept as is. Internal whitespace runs are not collapsed.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter_map(|c| match c {
            // hamza above/below, madda, wasla, dagger alif
            'أ' | 'إ' | 'آ' | 'ٱ' | '\u{0670}' => Some(PLAIN_ALIF),
            '\u{064B}'..='\u{065F}' => None,
            '\u{06D6}'..='\u{06ED}' => None,
            TATWEEL => None,
            _ => Some(c),
        })
        .collect();

    cleaned.trim().to_string()
}

/// Whether the raw text carries any harakat (U+064B..U+065F)
pub fn has_diacritics(text: &str) -> bool {
    text.chars().any(|c| ('\u{064B}'..='\u{065F}').contains(&c))
}

/// Split normalized text into words on single spaces.
///
/// Consecutive spaces produce empty words, which callers filter as noise.
pub fn split_words(normalized: &str) -> Vec<&str> {
    normalized.split(' ').collect()
}

/// Clean a chapter name for display, e.g. "سُورَةُ ٱلْفَاتِحَةِ" -> "الفاتحة"
pub fn format_chapter_name(name: &str) -> String {
    let normalized = normalize(name);
    strip_chapter_prefix(&normalized)
        .chars()
        .filter(|c| !('\u{0617}'..='\u{061A}').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Remove a leading "سورة" from already-normalized text
pub(crate) fn strip_chapter_prefix(normalized: &str) -> &str {
    normalized
        .strip_prefix(CHAPTER_PREFIX)
        .map(str::trim_start)
        .unwrap_or(normalized)
}
