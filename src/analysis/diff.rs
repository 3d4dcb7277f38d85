//! Sequence alignment in the style of Ratcliff/Obershelp "gestalt" matching.
//!
//! [`SequenceMatcher`] finds the longest contiguous matching block between two
//! sequences, then recurses on the unmatched regions to its left and right.
//! The resulting matching blocks are turned into [`Opcode`]s that describe how
//! to transform the first sequence into the second:
//!
//! ```text
//! a = [He, go, to, school.]
//! b = [He, goes, to, school.]
//!
//! equal   a[0..1] b[0..1]
//! replace a[1..2] b[1..2]
//! equal   a[2..4] b[2..4]
//! ```
//!
//! No "junk" heuristics are applied: every element takes part in matching, so
//! the alignment is fully determined by the longest-common-block rule.  In
//! particular, words that recur often in a long text (200+ words) are still
//! used as anchors rather than being discarded as "popular".

use std::collections::HashMap;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// Kind of edit described by an [`Opcode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// `a[i1..i2] == b[j1..j2]`.
    Equal,
    /// `b[j1..j2]` was inserted at `a[i1]` (`i1 == i2`).
    Insert,
    /// `a[i1..i2]` was deleted (`j1 == j2`).
    Delete,
    /// `a[i1..i2]` was replaced by `b[j1..j2]`.
    Replace,
}

/// A contiguous edit between two sequences.
///
/// Opcodes returned by [`SequenceMatcher::opcodes`] tile both sequences:
/// the first starts at `(0, 0)`, each one starts where the previous ended, and
/// the last ends at `(a.len(), b.len())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { tag, i1, i2, j1, j2 }
    }
}

/// A run of `size` equal elements: `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

// ---------------------------------------------------------------------------
// SequenceMatcher
// ---------------------------------------------------------------------------

/// Aligns two slices of comparable elements.
///
/// ```
/// use grammar_checker::analysis::{OpTag, SequenceMatcher};
///
/// let a = ["He", "go", "to", "school."];
/// let b = ["He", "goes", "to", "school."];
/// let tags: Vec<OpTag> = SequenceMatcher::new(&a, &b)
///     .opcodes()
///     .iter()
///     .map(|op| op.tag)
///     .collect();
/// assert_eq!(tags, [OpTag::Equal, OpTag::Replace, OpTag::Equal]);
/// ```
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Every position of each element of `b`, in ascending order.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elem) in b.iter().enumerate() {
            b2j.entry(elem).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, and
    /// among those the one starting earliest in `b`.  Returns a block of size
    /// zero (at `(alo, blo)`) when the ranges share no element.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let mut best = MatchingBlock {
            a_start: alo,
            b_start: blo,
            size: 0,
        };

        // j2len[j] = length of the longest match ending at a[i - 1], b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = MatchingBlock {
                            a_start: i + 1 - k,
                            b_start: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        best
    }

    /// All maximal matching blocks, ordered by position, followed by the
    /// zero-sized sentinel `(a.len(), b.len(), 0)`.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut pending = vec![(0, la, 0, lb)];
        let mut found = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            found.push(m);
            if alo < m.a_start && blo < m.b_start {
                pending.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                pending.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
        }
        found.sort_by_key(|m| (m.a_start, m.b_start));

        // Collapse blocks that touch end-to-start in both sequences.
        let mut blocks: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match blocks.last_mut() {
                Some(last)
                    if last.a_start + last.size == m.a_start
                        && last.b_start + last.size == m.b_start =>
                {
                    last.size += m.size;
                }
                _ => blocks.push(m),
            }
        }

        blocks.push(MatchingBlock {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        blocks
    }

    /// Edit script turning `a` into `b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut ops = Vec::new();
        let (mut i, mut j) = (0, 0);

        for block in self.matching_blocks() {
            let (ai, bj) = (block.a_start, block.b_start);
            let tag = match (i < ai, j < bj) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode::new(tag, i, ai, j, bj));
            }

            i = ai + block.size;
            j = bj + block.size;
            if block.size > 0 {
                ops.push(Opcode::new(OpTag::Equal, ai, i, bj, j));
            }
        }

        ops
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    fn tags(a: &[&str], b: &[&str]) -> Vec<OpTag> {
        SequenceMatcher::new(a, b)
            .opcodes()
            .iter()
            .map(|op| op.tag)
            .collect()
    }

    /// 250 words where "the" fills every other slot and the rest are unique.
    fn long_text_with_frequent_word() -> Vec<String> {
        (0..250)
            .map(|i| if i % 2 == 0 { "the".to_string() } else { format!("w{i}") })
            .collect()
    }

    #[test]
    fn frequent_words_stay_matchable_in_long_texts() {
        let original = long_text_with_frequent_word();
        let mut corrected = original.clone();
        corrected[101] = "dog".into();

        let a: Vec<&str> = original.iter().map(String::as_str).collect();
        let b: Vec<&str> = corrected.iter().map(String::as_str).collect();

        assert_eq!(
            SequenceMatcher::new(&a, &b).opcodes(),
            vec![
                Opcode::new(OpTag::Equal, 0, 101, 0, 101),
                Opcode::new(OpTag::Replace, 101, 102, 101, 102),
                Opcode::new(OpTag::Equal, 102, 250, 102, 250),
            ]
        );
    }

    #[test]
    fn identical_sequences_are_one_equal_run() {
        let a = words("the cat sat");
        let ops = SequenceMatcher::new(&a, &a).opcodes();
        assert_eq!(ops, vec![Opcode::new(OpTag::Equal, 0, 3, 0, 3)]);
    }

    #[test]
    fn both_empty_yields_no_opcodes() {
        let a: Vec<&str> = Vec::new();
        assert!(SequenceMatcher::new(&a, &a).opcodes().is_empty());
    }

    #[test]
    fn empty_original_is_single_insert() {
        let a: Vec<&str> = Vec::new();
        let b = words("brand new text");
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        assert_eq!(ops, vec![Opcode::new(OpTag::Insert, 0, 0, 0, 3)]);
    }

    #[test]
    fn empty_corrected_is_single_delete() {
        let a = words("gone now");
        let b: Vec<&str> = Vec::new();
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        assert_eq!(ops, vec![Opcode::new(OpTag::Delete, 0, 2, 0, 0)]);
    }

    #[test]
    fn single_word_substitution_is_replace() {
        let a = words("He go to school.");
        let b = words("He goes to school.");
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        assert_eq!(
            ops,
            vec![
                Opcode::new(OpTag::Equal, 0, 1, 0, 1),
                Opcode::new(OpTag::Replace, 1, 2, 1, 2),
                Opcode::new(OpTag::Equal, 2, 4, 2, 4),
            ]
        );
    }

    #[test]
    fn inserted_word_in_the_middle() {
        let a = words("I went store");
        let b = words("I went to the store");
        assert_eq!(tags(&a, &b), [OpTag::Equal, OpTag::Insert, OpTag::Equal]);
    }

    #[test]
    fn deleted_word_at_the_end() {
        let a = words("stop here please");
        let b = words("stop here");
        assert_eq!(tags(&a, &b), [OpTag::Equal, OpTag::Delete]);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let a = words("x y x y");
        let b = words("x y");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 4, 0, 2);
        assert_eq!(
            m,
            MatchingBlock {
                a_start: 0,
                b_start: 0,
                size: 2
            }
        );
    }

    #[test]
    fn matching_blocks_end_with_sentinel() {
        let a = words("a b c d");
        let b = words("a b x d");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks.last(),
            Some(&MatchingBlock {
                a_start: 4,
                b_start: 4,
                size: 0
            })
        );
        let matched: usize = blocks.iter().map(|m| m.size).sum();
        assert_eq!(matched, 3);
    }

    #[test]
    fn opcodes_tile_both_sequences() {
        let a = words("one two three four five six");
        let b = words("zero one three four 4.5 six seven");
        let ops = SequenceMatcher::new(&a, &b).opcodes();

        let (mut i, mut j) = (0, 0);
        for op in &ops {
            assert_eq!((op.i1, op.j1), (i, j), "opcodes must be contiguous");
            if op.tag == OpTag::Equal {
                assert_eq!(a[op.i1..op.i2], b[op.j1..op.j2]);
            }
            i = op.i2;
            j = op.j2;
        }
        assert_eq!((i, j), (a.len(), b.len()));
    }

    #[test]
    fn works_on_characters_too() {
        let a: Vec<char> = "abcd".chars().collect();
        let b: Vec<char> = "bcde".chars().collect();
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 4, 0, 4);
        assert_eq!(m.size, 3);
        assert_eq!((m.a_start, m.b_start), (1, 0));
    }
}
