//! Interned completion candidate with precomputed matching metadata.
//!
//! Module isolation ensures nothing outside this module can mutate a
//! `Candidate` after construction, so the derived fields can never go stale
//! and the value can be shared across threads without locking.

use crate::letter_index::{index_for_char, LetterIndex, NUM_LETTERS};
use crate::matcher;
use crate::ranking::MatchResult;
use std::sync::Arc;

/// Fixed 128-bit presence set, one bit per case-folded ASCII character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterBitset(u128);

const _: () = assert!(NUM_LETTERS == u128::BITS as usize);

impl LetterBitset {
    pub fn from_text(text: &str) -> Self {
        let bits = text
            .bytes()
            .filter_map(index_for_char)
            .fold(0u128, |acc, slot| acc | (1u128 << slot));
        LetterBitset(bits)
    }

    pub fn contains(&self, c: u8) -> bool {
        index_for_char(c).is_some_and(|slot| self.0 & (1u128 << slot) != 0)
    }

    /// Superset-or-equal test used as the cheap reject before a walk.
    pub fn contains_all(&self, other: &LetterBitset) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// True iff every byte is printable ASCII (space through `~`).
pub fn is_printable(text: &str) -> bool {
    text.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

pub fn has_uppercase(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_uppercase())
}

/// Lowercased characters that start a "word" inside an identifier: the first
/// character (unless it is `_`), an uppercase letter following a non-uppercase
/// one, and a letter following `_`.
pub fn word_boundary_chars(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut result = String::new();

    for (i, &c) in bytes.iter().enumerate() {
        let is_boundary = if i == 0 {
            c != b'_'
        } else {
            let prev = bytes[i - 1];
            (c.is_ascii_uppercase() && !prev.is_ascii_uppercase())
                || (prev == b'_' && c.is_ascii_alphabetic())
        };
        if is_boundary {
            result.push(c.to_ascii_lowercase() as char);
        }
    }

    result
}

/// One completion string plus everything the matcher needs about it.
#[derive(Debug)]
pub struct Candidate {
    text: Arc<str>,
    word_boundary_chars: String,
    is_lowercase: bool,
    letters_present: LetterBitset,
    letter_index: LetterIndex,
}

impl Candidate {
    /// Build a candidate. Text that is not entirely printable ASCII becomes the
    /// empty candidate, which matches no non-empty query.
    pub fn new(text: &str) -> Self {
        let text = if is_printable(text) { text } else { "" };
        Self {
            text: Arc::from(text),
            word_boundary_chars: word_boundary_chars(text),
            is_lowercase: !has_uppercase(text),
            letters_present: LetterBitset::from_text(text),
            letter_index: LetterIndex::new(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    pub fn word_boundary_chars(&self) -> &str {
        &self.word_boundary_chars
    }

    pub fn is_lowercase(&self) -> bool {
        self.is_lowercase
    }

    pub fn letters_present(&self) -> &LetterBitset {
        &self.letters_present
    }

    pub fn letter_index(&self) -> &LetterIndex {
        &self.letter_index
    }

    pub fn matches_query_bitset(&self, query_bitset: &LetterBitset) -> bool {
        self.letters_present.contains_all(query_bitset)
    }

    /// Greedy subsequence walk of `query` over this candidate.
    pub fn query_match_result(&self, query: &str, case_sensitive: bool) -> MatchResult {
        matcher::query_match_result(self, query, case_sensitive)
    }
}
