//! Candidate lists per (filetype, filepath) and the ranked query scan.
//!
//! One mutex guards the whole map and is held for the full duration of a scan,
//! so queries serialize against each other and against adds/clears. Candidate
//! payloads are immutable and read without locking.

use crate::candidate::{is_printable, Candidate};
use crate::matcher::PreparedQuery;
use crate::ranking::MatchResult;
use crate::repository::CandidateRepository;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// filepath -> candidates
pub type FilepathToCandidates = HashMap<String, Vec<Arc<Candidate>>>;
/// filetype -> filepath -> candidates
pub type FiletypeCandidateMap = HashMap<String, FilepathToCandidates>;
/// filetype -> filepath -> raw identifiers (e.g. parsed from tag files)
pub type FiletypeIdentifierMap = HashMap<String, HashMap<String, Vec<String>>>;

pub struct IdentifierDatabase {
    repository: Arc<CandidateRepository>,
    filetype_candidate_map: Mutex<FiletypeCandidateMap>,
}

impl IdentifierDatabase {
    pub fn new(repository: Arc<CandidateRepository>) -> Self {
        Self {
            repository,
            filetype_candidate_map: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &Arc<CandidateRepository> {
        &self.repository
    }

    /// Append candidates for a file. Repeats are kept.
    pub fn add_candidates<S: AsRef<str>>(&self, texts: &[S], filetype: &str, filepath: &str) {
        let candidates = self.repository.get_or_create(texts);
        let mut map = self.filetype_candidate_map.lock();
        map.entry(filetype.to_string())
            .or_default()
            .entry(filepath.to_string())
            .or_default()
            .extend(candidates);
        trace!(filetype, filepath, added = texts.len(), "added candidates");
    }

    /// Bulk append for every (filetype, filepath) in the map.
    pub fn add_identifier_map(&self, identifiers: FiletypeIdentifierMap) {
        let resolved: Vec<(String, String, Vec<Arc<Candidate>>)> = identifiers
            .into_iter()
            .flat_map(|(filetype, files)| {
                files
                    .into_iter()
                    .map(move |(filepath, texts)| (filetype.clone(), filepath, texts))
            })
            .map(|(filetype, filepath, texts)| {
                let candidates = self.repository.get_or_create(&texts);
                (filetype, filepath, candidates)
            })
            .collect();

        let mut map = self.filetype_candidate_map.lock();
        for (filetype, filepath, candidates) in resolved {
            map.entry(filetype)
                .or_default()
                .entry(filepath)
                .or_default()
                .extend(candidates);
        }
    }

    pub fn clear_candidates_stored_for_file(&self, filetype: &str, filepath: &str) {
        let mut map = self.filetype_candidate_map.lock();
        map.entry(filetype.to_string())
            .or_default()
            .insert(filepath.to_string(), Vec::new());
        trace!(filetype, filepath, "cleared candidates");
    }

    /// Replace a file's candidates in one critical section.
    pub fn clear_and_add_candidates<S: AsRef<str>>(&self, texts: &[S], filetype: &str, filepath: &str) {
        let candidates = self.repository.get_or_create(texts);
        let mut map = self.filetype_candidate_map.lock();
        map.entry(filetype.to_string())
            .or_default()
            .insert(filepath.to_string(), candidates);
    }

    /// Number of candidate references stored for a file (repeats included).
    pub fn candidate_count(&self, filetype: &str, filepath: &str) -> usize {
        let map = self.filetype_candidate_map.lock();
        map.get(filetype)
            .and_then(|files| files.get(filepath))
            .map_or(0, Vec::len)
    }

    /// Ranked matches for `query` among all candidates of `filetype`, best
    /// first. A candidate stored under several files is scored once.
    pub fn results_for_query_and_type(&self, query: &str, filetype: &str) -> Vec<MatchResult> {
        if query.is_empty() || !is_printable(query) {
            return Vec::new();
        }

        let map = self.filetype_candidate_map.lock();
        let Some(files) = map.get(filetype) else {
            return Vec::new();
        };

        #[cfg(feature = "perf-log")]
        let t0 = std::time::Instant::now();

        let prepared = PreparedQuery::new(query);
        let mut seen: HashSet<*const Candidate> = HashSet::new();
        let unique: Vec<&Arc<Candidate>> = files
            .values()
            .flatten()
            .filter(|candidate| seen.insert(Arc::as_ptr(*candidate)))
            .collect();

        let mut results: Vec<MatchResult> = unique
            .par_iter()
            .filter_map(|candidate| prepared.evaluate(candidate))
            .collect();
        results.sort();

        #[cfg(feature = "perf-log")]
        eprintln!(
            "[perf] scan={:.1}ms candidates={} matched={}",
            t0.elapsed().as_secs_f64() * 1000.0,
            unique.len(),
            results.len()
        );

        debug!(
            query,
            filetype,
            scanned = unique.len(),
            matched = results.len(),
            "scored candidates"
        );
        results
    }

    /// Ranked texts; `max_candidates == 0` means no limit.
    pub fn candidates_for_query_and_type(
        &self,
        query: &str,
        filetype: &str,
        max_candidates: usize,
    ) -> Vec<String> {
        let mut results = self.results_for_query_and_type(query, filetype);
        if max_candidates > 0 {
            results.truncate(max_candidates);
        }
        results.into_iter().map(MatchResult::into_text).collect()
    }
}
