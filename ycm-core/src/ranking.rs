//! Match-quality features and the ranking order for identifier candidates.
//!
//! Signals are compared in a fixed precedence where the first difference wins:
//!
//! 1. first character of query and candidate equal (case-insensitive)
//! 2. word-boundary plateau: when either side's query is made entirely of
//!    word-boundary characters, ratio then utilization decide
//! 3. query is a prefix of the candidate
//! 4. ratio of query chars that are word-boundary chars
//! 5. utilization of the candidate's word-boundary chars
//! 6. shorter text
//! 7. all-lowercase text
//! 8. lexicographic text (always the final tiebreak)
//!
//! "Better" sorts first: `Ordering::Less` means better.

use std::cmp::Ordering;
use std::sync::Arc;

/// `|a - b| <= max(|a|, |b|) * EPSILON`.
#[inline]
pub fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= a.abs().max(b.abs()) * f64::EPSILON
}

/// Features of one (candidate, query) evaluation.
#[derive(Debug, Clone)]
pub struct MatchResult {
    is_subsequence: bool,
    query_is_empty: bool,
    first_char_same: bool,
    ratio_of_word_boundary_chars_in_query: f64,
    word_boundary_char_utilization: f64,
    query_is_candidate_prefix: bool,
    text_is_lowercase: bool,
    text: Arc<str>,
}

impl MatchResult {
    /// Result for a query that is not a subsequence of `text`.
    pub fn not_subsequence(text: Arc<str>) -> Self {
        Self {
            is_subsequence: false,
            query_is_empty: true,
            first_char_same: false,
            ratio_of_word_boundary_chars_in_query: 0.0,
            word_boundary_char_utilization: 0.0,
            query_is_candidate_prefix: false,
            text_is_lowercase: false,
            text,
        }
    }

    /// Result for a successful walk; derives the ranking features.
    pub fn subsequence(
        text: Arc<str>,
        text_is_lowercase: bool,
        word_boundary_chars: &str,
        query: &str,
    ) -> Self {
        let mut result = Self {
            is_subsequence: true,
            query_is_empty: query.is_empty(),
            first_char_same: false,
            ratio_of_word_boundary_chars_in_query: 0.0,
            word_boundary_char_utilization: 0.0,
            query_is_candidate_prefix: false,
            text_is_lowercase,
            text,
        };
        result.set_features_from_query(word_boundary_chars, query);
        result
    }

    fn set_features_from_query(&mut self, word_boundary_chars: &str, query: &str) {
        let text = self.text.as_bytes();
        let query = query.as_bytes();
        if query.is_empty() || text.is_empty() {
            return;
        }

        self.first_char_same = query[0].eq_ignore_ascii_case(&text[0]);

        let wb = word_boundary_chars.as_bytes();
        let num_wb_chars = query
            .iter()
            .zip(wb)
            .take_while(|(q, w)| q.to_ascii_lowercase() == **w)
            .count();

        self.ratio_of_word_boundary_chars_in_query = num_wb_chars as f64 / query.len() as f64;
        if !wb.is_empty() {
            self.word_boundary_char_utilization = num_wb_chars as f64 / wb.len() as f64;
        }

        self.query_is_candidate_prefix =
            text.len() >= query.len() && text[..query.len()].eq_ignore_ascii_case(query);
    }

    pub fn is_subsequence(&self) -> bool {
        self.is_subsequence
    }

    pub fn first_char_same(&self) -> bool {
        self.first_char_same
    }

    pub fn ratio_of_word_boundary_chars_in_query(&self) -> f64 {
        self.ratio_of_word_boundary_chars_in_query
    }

    pub fn word_boundary_char_utilization(&self) -> f64 {
        self.word_boundary_char_utilization
    }

    pub fn query_is_candidate_prefix(&self) -> bool {
        self.query_is_candidate_prefix
    }

    pub fn text_is_lowercase(&self) -> bool {
        self.text_is_lowercase
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text.to_string()
    }

    /// Strict "ranks before" relation.
    pub fn is_better_than(&self, other: &MatchResult) -> bool {
        if !self.query_is_empty {
            if self.first_char_same != other.first_char_same {
                return self.first_char_same;
            }

            let equal_wb_ratios = almost_equal(
                self.ratio_of_word_boundary_chars_in_query,
                other.ratio_of_word_boundary_chars_in_query,
            );
            let equal_wb_utilization = almost_equal(
                self.word_boundary_char_utilization,
                other.word_boundary_char_utilization,
            );

            if almost_equal(self.ratio_of_word_boundary_chars_in_query, 1.0)
                || almost_equal(other.ratio_of_word_boundary_chars_in_query, 1.0)
            {
                if !equal_wb_ratios {
                    return self.ratio_of_word_boundary_chars_in_query
                        > other.ratio_of_word_boundary_chars_in_query;
                }
                if !equal_wb_utilization {
                    return self.word_boundary_char_utilization
                        > other.word_boundary_char_utilization;
                }
            }

            if self.query_is_candidate_prefix != other.query_is_candidate_prefix {
                return self.query_is_candidate_prefix;
            }

            if !equal_wb_ratios {
                return self.ratio_of_word_boundary_chars_in_query
                    > other.ratio_of_word_boundary_chars_in_query;
            }

            if !equal_wb_utilization {
                return self.word_boundary_char_utilization > other.word_boundary_char_utilization;
            }

            if self.text.len() != other.text.len() {
                return self.text.len() < other.text.len();
            }

            if self.text_is_lowercase != other.text_is_lowercase {
                return self.text_is_lowercase;
            }
        }

        self.text < other.text
    }
}

impl Ord for MatchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_better_than(other) {
            Ordering::Less
        } else if other.is_better_than(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl PartialOrd for MatchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MatchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MatchResult {}
