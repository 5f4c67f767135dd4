//! Interning store for candidates.
//!
//! Every distinct text gets exactly one `Candidate`, built on first sighting
//! and shared by `Arc` from then on. Nothing is ever removed: the store grows
//! with the set of identifiers seen during the process lifetime.

use crate::candidate::{is_printable, Candidate};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Texts longer than this are stored as the empty candidate.
pub const DEFAULT_MAX_CANDIDATE_LENGTH: usize = 80;

pub struct CandidateRepository {
    candidates: Mutex<HashMap<String, Arc<Candidate>>>,
    empty: Arc<Candidate>,
    /// 0 disables the cap.
    max_candidate_length: usize,
}

impl Default for CandidateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateRepository {
    pub fn new() -> Self {
        Self::with_max_candidate_length(DEFAULT_MAX_CANDIDATE_LENGTH)
    }

    pub fn with_max_candidate_length(max_candidate_length: usize) -> Self {
        Self {
            candidates: Mutex::new(HashMap::new()),
            empty: Arc::new(Candidate::new("")),
            max_candidate_length,
        }
    }

    fn validated_text<'t>(&self, text: &'t str) -> &'t str {
        let too_long = self.max_candidate_length > 0 && text.len() > self.max_candidate_length;
        if too_long || !is_printable(text) {
            ""
        } else {
            text
        }
    }

    /// Shared candidates for `texts`, in input order. Known texts return the
    /// existing handle; new ones are built and stored under the lock.
    pub fn get_or_create<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Arc<Candidate>> {
        let mut candidates = self.candidates.lock();
        let mut created = 0usize;

        let result = texts
            .iter()
            .map(|text| {
                let text = self.validated_text(text.as_ref());
                if text.is_empty() {
                    return Arc::clone(&self.empty);
                }
                if let Some(existing) = candidates.get(text) {
                    return Arc::clone(existing);
                }
                created += 1;
                let candidate = Arc::new(Candidate::new(text));
                candidates.insert(text.to_string(), Arc::clone(&candidate));
                candidate
            })
            .collect();

        if created > 0 {
            trace!(requested = texts.len(), created, total = candidates.len(), "interned candidates");
        }
        result
    }

    pub fn get_or_create_one(&self, text: &str) -> Arc<Candidate> {
        self.get_or_create(&[text])
            .pop()
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    /// Number of distinct non-empty candidates stored.
    pub fn len(&self) -> usize {
        self.candidates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_candidate_length(&self) -> usize {
        self.max_candidate_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_text_same_identity() {
        let repository = CandidateRepository::new();
        let first = repository.get_or_create(&["foo"]);
        let second = repository.get_or_create(&["foo"]);
        assert!(Arc::ptr_eq(&first[0], &second[0]));
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let repository = CandidateRepository::new();
        let texts: Vec<String> = ["b", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let candidates = repository.get_or_create(&texts);
        let got: Vec<&str> = candidates.iter().map(|c| c.text()).collect();
        assert_eq!(got, vec!["b", "a", "b", "c"]);
        assert!(Arc::ptr_eq(&candidates[0], &candidates[2]));
        assert_eq!(repository.len(), 3);
    }

    #[test]
    fn test_invalid_texts_share_the_empty_candidate() {
        let repository = CandidateRepository::new();
        let candidates = repository.get_or_create(&["fooδιακριτικός", "\x01\x05\x0a\x15"]);
        assert_eq!(candidates[0].text(), "");
        assert!(Arc::ptr_eq(&candidates[0], &candidates[1]));
        assert!(repository.is_empty());
    }

    #[test]
    fn test_overlong_texts_are_emptied() {
        let repository = CandidateRepository::new();
        let long = "a".repeat(DEFAULT_MAX_CANDIDATE_LENGTH + 1);
        let exact = "b".repeat(DEFAULT_MAX_CANDIDATE_LENGTH);
        let candidates = repository.get_or_create(&[long.as_str(), exact.as_str()]);
        assert_eq!(candidates[0].text(), "");
        assert_eq!(candidates[1].text(), exact);
    }

    #[test]
    fn test_length_cap_can_be_disabled() {
        let repository = CandidateRepository::with_max_candidate_length(0);
        let long = "a".repeat(500);
        assert_eq!(repository.get_or_create_one(&long).text(), long);
    }

    #[test]
    fn test_concurrent_interning_yields_one_candidate() {
        let repository = Arc::new(CandidateRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                thread::spawn(move || repository.get_or_create_one("shared_name"))
            })
            .collect();
        let candidates: Vec<Arc<Candidate>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(candidates.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(repository.len(), 1);
    }
}
