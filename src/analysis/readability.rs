//! Readability statistics: word count and a Flesch–Kincaid style grade level.
//!
//! Words here are maximal runs of word characters (alphanumerics and `_`), so
//! punctuation-only tokens such as `--` are ignored.  This intentionally
//! differs from the whitespace tokenisation used for highlighting.
//!
//! Syllables are estimated, not looked up: every contiguous group of the
//! vowels `a e i o u y` counts as one, a trailing `e` is treated as silent,
//! and every word has at least one syllable.  The estimate is wrong for plenty
//! of English words ("apple" counts as one) and the grade level inherits that.

use serde::{Deserialize, Serialize};

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

// ---------------------------------------------------------------------------
// ReadabilityReport
// ---------------------------------------------------------------------------

/// Statistics derived from a single text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadabilityReport {
    pub word_count: usize,
    /// Grade level rounded to two decimal places.
    pub grade_level: f64,
}

impl ReadabilityReport {
    pub fn analyze(text: &str) -> Self {
        Self {
            word_count: word_count(text),
            grade_level: grade_level(text),
        }
    }
}

/// Renders the stats line.  An empty text shows a bare `0`; any scored text
/// always shows a decimal point (`5.0`, `-2.23`).
impl std::fmt::Display for ReadabilityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.word_count == 0 {
            write!(f, "Word Count: 0 | Grade Level: 0")
        } else {
            write!(
                f,
                "Word Count: {} | Grade Level: {:?}",
                self.word_count, self.grade_level
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Maximal runs of word characters in `text`.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Number of `.`, `!` and `?` characters, never less than one.
pub fn sentence_count(text: &str) -> usize {
    text.chars()
        .filter(|c| matches!(c, '.' | '!' | '?'))
        .count()
        .max(1)
}

/// Estimated syllables in a single word.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();

    let mut count = 0usize;
    let mut prev_was_vowel = false;
    for c in word.chars() {
        let is_vowel = VOWELS.contains(&c);
        if is_vowel && !prev_was_vowel {
            count += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if word.ends_with('e') {
        count = count.saturating_sub(1).max(1);
    }
    count.max(1)
}

/// `0.39 * words/sentences + 11.8 * syllables/words - 15.59`, rounded to two
/// decimals.  Zero for text without words.
pub fn grade_level(text: &str) -> f64 {
    let word_count = word_count(text);
    if word_count == 0 {
        return 0.0;
    }

    let sentences = sentence_count(text) as f64;
    let syllables: usize = words(text).map(count_syllables).sum();
    let words = word_count as f64;

    let grade = 0.39 * (words / sentences) + 11.8 * (syllables as f64 / words) - 15.59;
    round2(grade)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
