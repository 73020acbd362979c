//! Sentence boundary detection.
//!
//! Boundaries come from the Unicode sentence rules (UAX #29), which already
//! keep decimals ("3.5"), dotted tickers ("BRK.B") and a period followed by a
//! lowercase word together. A second pass re-joins a boundary that falls after
//! a mixed-case or lowercase abbreviation ("Dr.", "Inc.") or a dotted one
//! ("U.S."). All-caps words are never abbreviations here: "MS." is Morgan
//! Stanley ending a sentence.

use unicode_segmentation::UnicodeSegmentation;

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt",
    "inc", "corp", "co", "ltd", "llc", "plc", "bros",
    "vs", "etc", "approx",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

/// True when `chunk` ends with a period that belongs to an abbreviation.
fn ends_with_abbreviation(chunk: &str) -> bool {
    let Some(before) = chunk.trim_end().strip_suffix('.') else {
        return false;
    };
    let Some(word) = before.split_whitespace().last() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());

    if word.contains('.') {
        // "U.S", "e.g", "a.m": every part a single letter
        return word
            .split('.')
            .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic));
    }

    if !word.chars().any(char::is_lowercase) {
        return false;
    }

    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Split `text` into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (idx, segment) in text.split_sentence_bound_indices() {
        let end = idx + segment.len();
        if end < text.len() && ends_with_abbreviation(&text[start..end]) {
            continue;
        }

        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = end;
    }

    sentences
}
