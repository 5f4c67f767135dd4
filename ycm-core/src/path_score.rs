//! Backtracking fuzzy scorer for path-like candidates.
//!
//! Unlike the identifier walk, this explores every alignment of the needle in
//! the haystack and keeps the best cumulative score. Each matched byte earns
//! up to `max_score_per_char`; a match that is not adjacent to the previous
//! one is discounted by what precedes it:
//!
//! | preceding byte                  | factor           |
//! |---------------------------------|------------------|
//! | `/`                             | 0.9              |
//! | `-` `_` space or a digit        | 0.8              |
//! | lowercase, match is uppercase   | 0.8              |
//! | `.`                             | 0.7              |
//! | anything else                   | 0.75 / distance  |
//!
//! Scores fall in `(0, 1]` for a match and are exactly `0.0` otherwise.

use rayon::prelude::*;

/// Knobs for [`calculate_match_score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOptions {
    pub case_sensitive: bool,
    /// Dot-files match even when the needle has no `.`.
    pub always_show_dot_files: bool,
    /// Dot-files never match.
    pub never_show_dot_files: bool,
}

/// True when some path component starts with `.`.
pub fn is_dot_file(haystack: &[u8]) -> bool {
    haystack
        .iter()
        .enumerate()
        .any(|(j, &b)| b == b'.' && (j == 0 || haystack[j - 1] == b'/'))
}

struct MatchState<'a> {
    raw: &'a [u8],
    haystack: Vec<u8>,
    needle: Vec<u8>,
    max_score_per_char: f64,
    /// Best score for `needle[i..]` given the previous match; indexed by
    /// `i * (len + 1) + (last + 1)`, where `last == -1` means "no match yet".
    memo: Vec<Option<Option<f64>>>,
}

impl<'a> MatchState<'a> {
    fn new(haystack: &'a [u8], needle: &[u8], case_sensitive: bool) -> Self {
        let fold = |bytes: &[u8]| -> Vec<u8> {
            if case_sensitive {
                bytes.to_vec()
            } else {
                bytes.to_ascii_lowercase()
            }
        };
        let max_score_per_char =
            (1.0 / haystack.len() as f64 + 1.0 / needle.len() as f64) / 2.0;
        Self {
            raw: haystack,
            haystack: fold(haystack),
            needle: fold(needle),
            max_score_per_char,
            memo: vec![None; needle.len() * (haystack.len() + 1)],
        }
    }

    fn score_for_char(&self, j: usize, last: Option<usize>) -> f64 {
        let distance = j - last.unwrap_or(0);
        if distance <= 1 {
            return self.max_score_per_char;
        }
        let prev = self.raw[j - 1];
        let curr = self.raw[j];
        let factor = match prev {
            b'/' => 0.9,
            b'-' | b'_' | b' ' | b'0'..=b'9' => 0.8,
            b'a'..=b'z' if curr.is_ascii_uppercase() => 0.8,
            b'.' => 0.7,
            _ => 0.75 / distance as f64,
        };
        self.max_score_per_char * factor
    }

    /// Best additional score for `needle[i..]` after a match at `last`, or
    /// `None` when the rest of the needle cannot be placed.
    fn best_from(&mut self, i: usize, last: Option<usize>) -> Option<f64> {
        if i == self.needle.len() {
            return Some(0.0);
        }
        let key = i * (self.haystack.len() + 1) + last.map_or(0, |l| l + 1);
        if let Some(cached) = self.memo[key] {
            return cached;
        }

        let start = last.map_or(0, |l| l + 1);
        let remaining = self.needle.len() - i;
        let mut best: Option<f64> = None;

        if self.haystack.len() >= start + remaining {
            let c = self.needle[i];
            for j in start..=(self.haystack.len() - remaining) {
                if self.haystack[j] != c {
                    continue;
                }
                if let Some(rest) = self.best_from(i + 1, Some(j)) {
                    let total = self.score_for_char(j, last) + rest;
                    if best.map_or(true, |b| total > b) {
                        best = Some(total);
                    }
                }
            }
        }

        self.memo[key] = Some(best);
        best
    }
}

/// Score `needle` against `haystack`; `0.0` when it is not a subsequence or a
/// dot-file rule hides the haystack.
pub fn calculate_match_score(haystack: &str, needle: &str, options: &ScoreOptions) -> f64 {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();

    if is_dot_file(haystack) {
        let dot_search = needle.contains(&b'.');
        if options.never_show_dot_files || (!options.always_show_dot_files && !dot_search) {
            return 0.0;
        }
    }

    if needle.is_empty() {
        return 1.0;
    }
    if haystack.is_empty() {
        return 0.0;
    }

    MatchState::new(haystack, needle, options.case_sensitive)
        .best_from(0, None)
        .unwrap_or(0.0)
}

/// Score every path and return the matches best first (ties by path), capped
/// at `limit` when it is non-zero.
pub fn filter_and_sort_paths<S: AsRef<str> + Sync>(
    paths: &[S],
    needle: &str,
    options: &ScoreOptions,
    limit: usize,
) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = paths
        .par_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            let score = calculate_match_score(path, needle, options);
            (score > 0.0).then(|| (path.to_string(), score))
        })
        .collect();

    scored.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if limit > 0 {
        scored.truncate(limit);
    }
    scored
}
