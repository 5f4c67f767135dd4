//! Greedy subsequence walk over a candidate's letter index.
//!
//! For each query character the walk takes the leftmost remaining occurrence
//! (or, for an uppercase character in a case-sensitive query, the leftmost
//! remaining *uppercase* occurrence) and never revisits that choice. No
//! alternative alignment is explored, so the walk says nothing about which
//! alignment is "best"; ranking relies only on the features computed after a
//! successful walk.

use crate::candidate::{has_uppercase, Candidate, LetterBitset};
use crate::letter_index::WalkPosition;
use crate::ranking::MatchResult;

/// Walk `query` over `candidate`; `case_sensitive` forces uppercase query
/// characters onto uppercase candidate characters.
pub fn query_match_result(candidate: &Candidate, query: &str, case_sensitive: bool) -> MatchResult {
    let index = candidate.letter_index();
    let mut position = WalkPosition::Root;

    for c in query.bytes() {
        let Some(nearest) = index.nearest_for_letter(position, c) else {
            return MatchResult::not_subsequence(candidate.shared_text());
        };

        let next = if case_sensitive && c.is_ascii_uppercase() {
            index.first_uppercase(nearest)
        } else {
            nearest.first().map(|&p| p as usize)
        };

        match next {
            Some(p) => position = WalkPosition::Node(p),
            None => return MatchResult::not_subsequence(candidate.shared_text()),
        }
    }

    MatchResult::subsequence(
        candidate.shared_text(),
        candidate.is_lowercase(),
        candidate.word_boundary_chars(),
        query,
    )
}

/// A query with its bitset and case mode computed once per scan.
#[derive(Debug, Clone)]
pub struct PreparedQuery<'q> {
    text: &'q str,
    bitset: LetterBitset,
    case_sensitive: bool,
}

impl<'q> PreparedQuery<'q> {
    /// The walk is case-sensitive iff the query has an uppercase letter.
    pub fn new(text: &'q str) -> Self {
        Self {
            text,
            bitset: LetterBitset::from_text(text),
            case_sensitive: has_uppercase(text),
        }
    }

    pub fn text(&self) -> &str {
        self.text
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn bitset(&self) -> &LetterBitset {
        &self.bitset
    }

    /// Bitset prefilter followed by the walk; `None` unless the query is a
    /// subsequence of the candidate.
    pub fn evaluate(&self, candidate: &Candidate) -> Option<MatchResult> {
        if !candidate.matches_query_bitset(&self.bitset) {
            return None;
        }
        let result = query_match_result(candidate, self.text, self.case_sensitive);
        result.is_subsequence().then_some(result)
    }
}
