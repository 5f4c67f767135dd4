//! Rank arbitrary host objects with the identifier matcher.
//!
//! The host hands over a list of opaque objects and says where the text lives
//! (a named string property, or the object itself). Texts are interned through
//! the repository, so repeated filtering of the same completion lists reuses
//! the already-built candidates.

use crate::candidate::is_printable;
use crate::matcher::PreparedQuery;
use crate::ranking::MatchResult;
use crate::repository::CandidateRepository;
use serde_json::Value;

/// Keep the items whose text matches `query`, best first. An empty query
/// returns `items` untouched; a non-printable query returns nothing.
/// `max_candidates == 0` means no limit.
pub fn filter_and_sort_by<T, F>(
    repository: &CandidateRepository,
    items: Vec<T>,
    text_of: F,
    query: &str,
    max_candidates: usize,
) -> Vec<T>
where
    F: Fn(&T) -> Option<&str>,
{
    if query.is_empty() {
        return items;
    }
    if !is_printable(query) {
        return Vec::new();
    }

    let texts: Vec<&str> = items.iter().map(|item| text_of(item).unwrap_or("")).collect();
    let candidates = repository.get_or_create(&texts);
    let prepared = PreparedQuery::new(query);

    let mut ranked: Vec<(MatchResult, usize)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| prepared.evaluate(candidate).map(|result| (result, i)))
        .collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0));
    if max_candidates > 0 {
        ranked.truncate(max_candidates);
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    ranked
        .into_iter()
        .filter_map(|(_, i)| slots[i].take())
        .collect()
}

/// Text of a host object: the object itself when `property` is empty,
/// otherwise its `property` field. Non-string values have no text.
pub fn candidate_text<'v>(object: &'v Value, property: &str) -> Option<&'v str> {
    if property.is_empty() {
        object.as_str()
    } else {
        object.get(property).and_then(Value::as_str)
    }
}

/// Filter JSON host objects keyed by `property`.
pub fn filter_and_sort_candidates(
    repository: &CandidateRepository,
    candidates: Vec<Value>,
    property: &str,
    query: &str,
) -> Vec<Value> {
    filter_and_sort_by(
        repository,
        candidates,
        |object| candidate_text(object, property),
        query,
        0,
    )
}

/// Filter plain strings.
pub fn filter_and_sort_strings(
    repository: &CandidateRepository,
    candidates: Vec<String>,
    query: &str,
    max_candidates: usize,
) -> Vec<String> {
    filter_and_sort_by(repository, candidates, |s| Some(s.as_str()), query, max_candidates)
}
