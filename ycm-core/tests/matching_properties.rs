//! Randomized checks of the matcher and the ranking order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use ycm_core::matcher::PreparedQuery;
use ycm_core::{Candidate, CandidateRepository, IdentifierDatabase, MatchResult};
use std::sync::Arc;

const ALPHABET: &[u8] = b"abcABC_1";

fn random_text(rng: &mut StdRng, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Smart-case subsequence test by direct scan.
fn brute_force_is_subsequence(text: &str, query: &str) -> bool {
    let case_sensitive = query.bytes().any(|b| b.is_ascii_uppercase());
    let mut text_bytes = text.bytes();
    query.bytes().all(|q| {
        text_bytes.any(|t| {
            if case_sensitive && q.is_ascii_uppercase() {
                t == q
            } else {
                t.eq_ignore_ascii_case(&q)
            }
        })
    })
}

// ── subsequence matching ─────────────────────────────────────────

#[test]
fn test_walk_agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..5_000 {
        let text = random_text(&mut rng, 0, 10);
        let query = random_text(&mut rng, 1, 4);
        let candidate = Candidate::new(&text);
        let expected = brute_force_is_subsequence(&text, &query);
        let evaluated = PreparedQuery::new(&query).evaluate(&candidate);
        assert_eq!(
            evaluated.is_some(),
            expected,
            "text {:?} query {:?}",
            text,
            query
        );
    }
}

#[test]
fn test_bitset_never_rejects_a_subsequence() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..5_000 {
        let text = random_text(&mut rng, 1, 12);
        let query = random_text(&mut rng, 1, 5);
        if brute_force_is_subsequence(&text, &query) {
            let candidate = Candidate::new(&text);
            let prepared = PreparedQuery::new(&query);
            assert!(
                candidate.matches_query_bitset(prepared.bitset()),
                "bitset rejected {:?} for {:?}",
                text,
                query
            );
        }
    }
}

#[test]
fn test_every_text_matches_itself_and_the_empty_query() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let text = random_text(&mut rng, 1, 12);
        let candidate = Candidate::new(&text);
        assert!(candidate.query_match_result(&text, true).is_subsequence());
        assert!(candidate.query_match_result("", false).is_subsequence());
    }
}

// ── ranking order ────────────────────────────────────────────────

fn random_results(seed: u64, query: &str, count: usize) -> Vec<MatchResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    let prepared = PreparedQuery::new(query);
    let mut results = Vec::new();
    while results.len() < count {
        let candidate = Candidate::new(&random_text(&mut rng, 1, 8));
        if let Some(result) = prepared.evaluate(&candidate) {
            results.push(result);
        }
    }
    results
}

#[test]
fn test_comparator_is_a_strict_weak_order() {
    for (seed, query) in [(1u64, "a"), (2, "ab"), (3, "aB"), (4, "c_")] {
        let results = random_results(seed, query, 40);
        for a in &results {
            assert!(!a.is_better_than(a));
            for b in &results {
                if a.is_better_than(b) {
                    assert!(!b.is_better_than(a));
                }
                for c in &results {
                    if a.is_better_than(b) && b.is_better_than(c) {
                        assert!(a.is_better_than(c), "{:?} {:?} {:?}", a.text(), b.text(), c.text());
                    }
                }
            }
        }
    }
}

#[test]
fn test_sort_is_deterministic() {
    let mut forward = random_results(11, "ab", 60);
    let mut backward = forward.clone();
    backward.reverse();
    forward.sort();
    backward.sort();
    let forward: Vec<&str> = forward.iter().map(MatchResult::text).collect();
    let backward: Vec<&str> = backward.iter().map(MatchResult::text).collect();
    assert_eq!(forward, backward);
}

#[test]
fn test_equal_results_compare_equal() {
    let results = random_results(5, "a", 20);
    for result in &results {
        assert_eq!(result.cmp(&result.clone()), Ordering::Equal);
    }
}

// ── database examples ────────────────────────────────────────────

#[test]
fn test_uppercase_query_prefers_camel_case() {
    let db = IdentifierDatabase::new(Arc::new(CandidateRepository::new()));
    db.add_candidates(&["foo_bar", "foobar", "FooBar"], "c", "/a.c");
    assert_eq!(db.candidates_for_query_and_type("FB", "c", 0), vec!["FooBar"]);
}

#[test]
fn test_lowercase_query_ranks_word_boundaries_first() {
    let db = IdentifierDatabase::new(Arc::new(CandidateRepository::new()));
    db.add_candidates(&["foobar", "FooBar", "foo_bar"], "c", "/a.c");
    let ranked = db.candidates_for_query_and_type("fb", "c", 0);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked.last().map(String::as_str), Some("foobar"));
}
