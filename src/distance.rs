//! Levenshtein distance and single-word spelling correction

use crate::corpus::Vocabulary;
use crate::normalize::normalize;

/// Candidates at this distance or further are rejected
pub const MAX_CORRECTION_DISTANCE: usize = 3;

/// Classic Levenshtein distance over chars (insert, delete, substitute cost 1).
///
/// Keeps two rows sized to the shorter input; the longer input drives the outer loop.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current: Vec<usize> = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(lc != sc);
            current[j + 1] = insertion.min(deletion).min(substitution);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// A vocabulary word close enough to stand in for a failed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub word: String,
    pub distance: usize,
}

/// Find the closest vocabulary word to `query` with distance below
/// [`MAX_CORRECTION_DISTANCE`].
///
/// Scans in vocabulary order and keeps the first minimum. Stops at the first
/// distance-1 hit without looking for a better one.
pub fn closest_word(query: &str, vocabulary: &Vocabulary) -> Option<Correction> {
    let normalized = normalize(query);
    let mut best: Option<Correction> = None;
    let mut min_distance = MAX_CORRECTION_DISTANCE;

    for word in vocabulary.iter() {
        let distance = edit_distance(&normalized, word);
        if distance < min_distance {
            min_distance = distance;
            best = Some(Correction {
                word: word.to_string(),
                distance,
            });
        }
        if min_distance == 1 {
            break;
        }
    }

    best
}
