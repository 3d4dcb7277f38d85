//! Text analysis for corrected output.
//!
//! * [`SequenceMatcher`]: longest-matching-block alignment producing [`Opcode`]s.
//! * [`highlight`]: maps word-level changes to [`DiffSpan`]s of the corrected text.
//! * [`segments`]: splits text into plain / highlighted pieces for rendering.
//! * [`ReadabilityReport`]: word count and grade level.
//!
//! Everything in this module is pure and allocation-only; it is safe to call
//! from any thread.

pub mod diff;
pub mod highlight;
pub mod readability;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use diff::{MatchingBlock, OpTag, Opcode, SequenceMatcher};
pub use highlight::{highlight, segments, DiffSpan, Segment};
pub use readability::{count_syllables, grade_level, sentence_count, word_count, ReadabilityReport};
