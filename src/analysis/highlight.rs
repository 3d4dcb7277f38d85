//! Word-level change highlighting.
//!
//! [`highlight`] aligns the whitespace-delimited words of the original and
//! corrected texts with [`SequenceMatcher`] and maps every non-equal opcode to
//! a character range of the corrected text.
//!
//! Offsets come from a running cursor that assumes words are separated by a
//! single space and counts that separator after *every* word, including the
//! last one.  A span covering the final word therefore ends one character
//! past the end of the text, and texts with runs of whitespace or newlines
//! drift by the extra separator width.  Consumers clamp spans to the text
//! (see [`segments`]).

use super::diff::{OpTag, SequenceMatcher};

// ---------------------------------------------------------------------------
// DiffSpan
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` range of **character** (not byte) offsets into the
/// corrected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSpan {
    pub start: usize,
    pub end: usize,
}

impl DiffSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ---------------------------------------------------------------------------
// highlight
// ---------------------------------------------------------------------------

/// Character spans of `corrected` that differ from `original` at word level.
///
/// Spans are sorted by `start` and never overlap.  Deletions leave nothing in
/// the corrected text to mark, so they produce no span.
///
/// ```
/// use grammar_checker::analysis::{highlight, DiffSpan};
///
/// let spans = highlight("He go to school.", "He goes to school.");
/// assert_eq!(spans, vec![DiffSpan::new(3, 8)]);
/// ```
pub fn highlight(original: &str, corrected: &str) -> Vec<DiffSpan> {
    let original_words: Vec<&str> = original.split_whitespace().collect();
    let corrected_words: Vec<&str> = corrected.split_whitespace().collect();

    if corrected_words.is_empty() {
        return Vec::new();
    }

    let matcher = SequenceMatcher::new(&original_words, &corrected_words);
    let opcodes = matcher.opcodes();
    log::debug!(
        "highlight: {} original words, {} corrected words, {} opcodes",
        original_words.len(),
        corrected_words.len(),
        opcodes.len()
    );

    let mut spans = Vec::new();
    let mut cursor = 0;
    for op in opcodes {
        // Each word contributes its length plus one separator.
        let width: usize = corrected_words[op.j1..op.j2]
            .iter()
            .map(|w| w.chars().count() + 1)
            .sum();

        if op.tag != OpTag::Equal && width > 0 {
            spans.push(DiffSpan::new(cursor, cursor + width));
        }
        cursor += width;
    }

    spans
}

// ---------------------------------------------------------------------------
// segments
// ---------------------------------------------------------------------------

/// A contiguous piece of the corrected text, flagged when it falls inside a
/// [`DiffSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Split `text` into alternating plain / highlighted pieces.
///
/// Spans are clamped to the text, so the one-past-the-end overshoot produced
/// by [`highlight`] is harmless.  Concatenating the `text` of every returned
/// segment reproduces `text` exactly.  `spans` must be sorted and
/// non-overlapping, as [`highlight`] guarantees.
pub fn segments<'a>(text: &'a str, spans: &[DiffSpan]) -> Vec<Segment<'a>> {
    // Byte offset of every char boundary, plus the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let byte_at = |c: usize| boundaries[c.min(char_len)];

    let mut out = Vec::with_capacity(spans.len() * 2 + 1);
    let mut pos = 0;
    for span in spans {
        let start = span.start.clamp(pos, char_len);
        let end = span.end.clamp(start, char_len);

        if start > pos {
            out.push(Segment {
                text: &text[byte_at(pos)..byte_at(start)],
                highlighted: false,
            });
        }
        if end > start {
            out.push(Segment {
                text: &text[byte_at(start)..byte_at(end)],
                highlighted: true,
            });
        }
        pos = end;
    }
    if pos < char_len {
        out.push(Segment {
            text: &text[byte_at(pos)..],
            highlighted: false,
        });
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighted_text<'a>(text: &'a str, spans: &[DiffSpan]) -> Vec<&'a str> {
        segments(text, spans)
            .into_iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn long_text_marks_only_the_changed_word() {
        let words: Vec<String> = (0..250)
            .map(|i| if i % 2 == 0 { "the".to_string() } else { format!("w{i}") })
            .collect();
        let original = words.join(" ");
        let mut changed = words.clone();
        changed[101] = "dog".into();
        let corrected = changed.join(" ");

        let start: usize = changed[..101].iter().map(|w| w.chars().count() + 1).sum();
        let spans = highlight(&original, &corrected);

        assert_eq!(spans, vec![DiffSpan::new(start, start + 4)]);
        assert_eq!(highlighted_text(&corrected, &spans), vec!["dog "]);
    }

    fn assert_sorted_disjoint(spans: &[DiffSpan]) {
        for pair in spans.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "spans overlap or are unsorted: {:?}",
                pair
            );
        }
    }

    #[test]
    fn identical_texts_have_no_spans() {
        assert!(highlight("Nothing to fix here.", "Nothing to fix here.").is_empty());
    }

    #[test]
    fn empty_corrected_text_has_no_spans() {
        assert!(highlight("some words", "").is_empty());
        assert!(highlight("", "").is_empty());
        assert!(highlight("some words", "   ").is_empty());
    }

    #[test]
    fn replaced_word_span_includes_trailing_separator() {
        let corrected = "He goes to school.";
        let spans = highlight("He go to school.", corrected);
        assert_eq!(spans, vec![DiffSpan::new(3, 8)]);
        assert_eq!(highlighted_text(corrected, &spans), ["goes "]);
    }

    #[test]
    fn empty_original_highlights_everything() {
        let corrected = "All new words";
        let spans = highlight("", corrected);
        // One separator per word, so the span runs one past the end.
        assert_eq!(spans, vec![DiffSpan::new(0, 14)]);
        assert_eq!(highlighted_text(corrected, &spans), [corrected]);
    }

    #[test]
    fn last_word_span_overshoots_by_one() {
        let corrected = "I like apples";
        let spans = highlight("I like pears", corrected);
        assert_eq!(spans, vec![DiffSpan::new(7, 14)]);
        assert_eq!(corrected.chars().count(), 13);
        assert_eq!(highlighted_text(corrected, &spans), ["apples"]);
    }

    #[test]
    fn deletion_produces_no_span_but_later_changes_still_line_up() {
        let corrected = "the cat sat down";
        let spans = highlight("the big cat sat up", corrected);
        assert_eq!(highlighted_text(corrected, &spans), ["down"]);
    }

    #[test]
    fn multiple_changes_are_sorted_and_disjoint() {
        let original = "their going too the store tomorow, and they buys milk";
        let corrected = "They're going to the store tomorrow, and they buy milk.";
        let spans = highlight(original, corrected);
        assert!(spans.len() >= 3);
        assert_sorted_disjoint(&spans);
    }

    #[test]
    fn punctuation_is_part_of_the_word() {
        let corrected = "Hello, world!";
        let spans = highlight("Hello world", corrected);
        assert_eq!(spans, vec![DiffSpan::new(0, 14)]);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let corrected = "café crème brûlée";
        let spans = highlight("cafe crème brûlée", corrected);
        assert_eq!(spans, vec![DiffSpan::new(0, 5)]);
        assert_eq!(highlighted_text(corrected, &spans), ["café "]);
    }

    #[test]
    fn segments_reconstruct_the_text() {
        let cases = [
            ("He go to school.", "He goes to school."),
            ("", "Completely new."),
            ("a b c d e", "a x c y e z"),
            ("naïve façade", "naive facade here"),
            ("same", "same"),
        ];
        for (original, corrected) in cases {
            let spans = highlight(original, corrected);
            assert_sorted_disjoint(&spans);
            let rebuilt: String = segments(corrected, &spans)
                .iter()
                .map(|s| s.text)
                .collect();
            assert_eq!(rebuilt, corrected);
        }
    }

    #[test]
    fn segments_without_spans_is_one_plain_piece() {
        let segs = segments("plain text", &[]);
        assert_eq!(
            segs,
            vec![Segment {
                text: "plain text",
                highlighted: false
            }]
        );
        assert!(segments("", &[]).is_empty());
    }

    #[test]
    fn span_helpers() {
        let span = DiffSpan::new(4, 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(DiffSpan::new(3, 3).is_empty());
    }
}
