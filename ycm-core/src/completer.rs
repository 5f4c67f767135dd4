//! IdentifierCompleter - main API for host editors
//!
//! Owns the candidate repository and the identifier database and wires them to
//! the buffer/tag-file extractors and the path scorer.
//!
//! Async query architecture:
//! Every `query_async` call takes a ticket from a generation counter. The scan
//! runs on a blocking thread and checks its ticket (and a CancellationToken
//! tripped by a DropGuard when the host drops the future) before and after
//! scoring. A ticket that is no longer current resolves to `Superseded`, so
//! only the most recent keystroke's results reach the host.

use crate::candidate::has_uppercase;
use crate::config::CompleterConfig;
use crate::database::{FiletypeIdentifierMap, IdentifierDatabase};
use crate::filter;
use crate::identifier_utils::{
    extract_identifiers_from_tags_file, extract_identifiers_from_text, remove_identifier_free_text,
    TagsResult,
};
use crate::interface::{CompleterError, IdentifierCompleterApi, ScoredPath};
use crate::path_score::{filter_and_sort_paths, ScoreOptions};
use crate::repository::CandidateRepository;
use crate::worker_pool::init_worker_pool;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Global fallback Tokio runtime for async calls made outside any runtime
/// (uniffi does not provide one). Shared by all completers, never dropped.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

/// RAII guard that cancels a token when dropped.
struct DropGuard {
    token: CancellationToken,
}

impl DropGuard {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Monotonic query counter; the highest ticket handed out is the live one.
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

#[derive(uniffi::Object)]
pub struct IdentifierCompleter {
    database: Arc<IdentifierDatabase>,
    config: CompleterConfig,
    generation: Arc<Generation>,
}

// Internal implementation (not exported via FFI)
impl IdentifierCompleter {
    /// Build a completer around an existing repository, e.g. one shared with
    /// other completers.
    pub fn with_repository(repository: Arc<CandidateRepository>, config: CompleterConfig) -> Self {
        init_worker_pool(&config);
        Self {
            database: Arc::new(IdentifierDatabase::new(repository)),
            config,
            generation: Arc::new(Generation::default()),
        }
    }

    pub fn with_config(config: CompleterConfig) -> Self {
        let repository = Arc::new(CandidateRepository::with_max_candidate_length(config.max_candidate_length));
        Self::with_repository(repository, config)
    }

    pub fn database(&self) -> &IdentifierDatabase {
        &self.database
    }

    pub fn repository(&self) -> &Arc<CandidateRepository> {
        self.database.repository()
    }

    pub fn config(&self) -> &CompleterConfig {
        &self.config
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current().unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    /// Load one ctags file. Returns the number of identifiers added.
    pub fn load_tag_file(&self, path: &Path) -> Result<u64, CompleterError> {
        let identifiers = extract_identifiers_from_tags_file(path)?;
        Ok(self.add_tag_identifiers(path, identifiers))
    }

    fn add_tag_identifiers(&self, path: &Path, identifiers: FiletypeIdentifierMap) -> u64 {
        let count: usize = identifiers
            .values()
            .flat_map(|files| files.values())
            .map(Vec::len)
            .sum();
        self.database.add_identifier_map(identifiers);
        debug!(path = %path.display(), count, "loaded tag file");
        count as u64
    }

    /// Blocking body of `query_async`.
    fn query_sync(
        database: &IdentifierDatabase,
        query: &str,
        filetype: &str,
        max_candidates: usize,
        ticket: u64,
        generation: &Generation,
        token: &CancellationToken,
    ) -> Result<Vec<String>, CompleterError> {
        Self::check_live(ticket, generation, token)?;
        let results = database.candidates_for_query_and_type(query, filetype, max_candidates);
        Self::check_live(ticket, generation, token)?;
        Ok(results)
    }

    fn check_live(ticket: u64, generation: &Generation, token: &CancellationToken) -> Result<(), CompleterError> {
        if token.is_cancelled() {
            return Err(CompleterError::Cancelled);
        }
        if !generation.is_current(ticket) {
            return Err(CompleterError::Superseded);
        }
        Ok(())
    }
}

// FFI-exported constructors (must be in standalone impl block)
#[uniffi::export]
impl IdentifierCompleter {
    /// Create a completer with default settings.
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::with_config(CompleterConfig::default())
    }

    /// Create a completer configured from a JSON file.
    #[uniffi::constructor]
    pub fn from_config_file(path: String) -> Result<Self, CompleterError> {
        let config = CompleterConfig::load(&path)?;
        Ok(Self::with_config(config))
    }
}

impl Default for IdentifierCompleter {
    fn default() -> Self {
        Self::new()
    }
}

// Helpers that are not part of the host-implementable trait
#[uniffi::export]
impl IdentifierCompleter {
    /// Ranked identifiers stored without a filetype, capped at `max_results`.
    pub fn candidates_for_query(&self, query: String) -> Vec<String> {
        self.database
            .candidates_for_query_and_type(&query, "", self.config.max_results)
    }

    /// Rank arbitrary strings against `query`.
    pub fn filter_and_sort_candidates(&self, candidates: Vec<String>, query: String, max_candidates: u32) -> Vec<String> {
        filter::filter_and_sort_strings(self.repository(), candidates, &query, max_candidates as usize)
    }

    /// Rank file paths with the path scorer. Smart case: an uppercase letter
    /// in `query` makes the match case-sensitive.
    pub fn score_paths(&self, paths: Vec<String>, query: String, max_candidates: u32) -> Vec<ScoredPath> {
        let options = ScoreOptions {
            case_sensitive: has_uppercase(&query),
            ..ScoreOptions::default()
        };
        filter_and_sort_paths(&paths, &query, &options, max_candidates as usize)
            .into_iter()
            .map(|(path, score)| ScoredPath { path, score })
            .collect()
    }
}

#[uniffi::export]
#[async_trait::async_trait]
impl IdentifierCompleterApi for IdentifierCompleter {
    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    async fn query_async(&self, query: String, filetype: String, max_candidates: u32) -> Result<Vec<String>, CompleterError> {
        let ticket = self.generation.begin();

        let token = CancellationToken::new();
        let _guard = DropGuard::new(token.clone());

        let database = Arc::clone(&self.database);
        let generation = Arc::clone(&self.generation);
        let token_clone = token.clone();

        let handle = self.runtime_handle().spawn_blocking(move || {
            Self::query_sync(
                &database,
                &query,
                &filetype,
                max_candidates as usize,
                ticket,
                &generation,
                &token_clone,
            )
        });

        match handle.await {
            Ok(Ok(results)) if self.generation.is_current(ticket) => Ok(results),
            Ok(Ok(_)) => Err(CompleterError::Superseded),
            Ok(Err(e)) => Err(e),
            Err(_join_error) => Err(CompleterError::Cancelled),
        }
    }

    fn candidates_for_query_and_type(&self, query: String, filetype: String, max_candidates: u32) -> Vec<String> {
        self.database
            .candidates_for_query_and_type(&query, &filetype, max_candidates as usize)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Population
    // ─────────────────────────────────────────────────────────────────────────────

    fn add_identifiers_to_database(&self, identifiers: Vec<String>, filetype: String, filepath: String) {
        self.database.add_candidates(&identifiers, &filetype, &filepath);
    }

    fn clear_for_file_and_add_identifiers_to_database(&self, identifiers: Vec<String>, filetype: String, filepath: String) {
        self.database
            .clear_and_add_candidates(&identifiers, &filetype, &filepath);
    }

    fn add_identifiers_to_database_from_buffer(
        &self,
        filetype: String,
        filepath: String,
        buffer: String,
        collect_from_comments_and_strings: bool,
    ) {
        let identifiers = if collect_from_comments_and_strings {
            extract_identifiers_from_text(&buffer)
        } else {
            extract_identifiers_from_text(&remove_identifier_free_text(&buffer))
        };
        self.database
            .clear_and_add_candidates(&identifiers, &filetype, &filepath);
    }

    fn add_identifiers_to_database_from_tag_files(&self, tag_files: Vec<String>) -> u64 {
        // Parse on the pool; the database lock is only taken from this thread.
        let parsed: Vec<TagsResult<FiletypeIdentifierMap>> = tag_files
            .par_iter()
            .map(|path| extract_identifiers_from_tags_file(Path::new(path)))
            .collect();

        parsed
            .into_iter()
            .zip(&tag_files)
            .map(|(result, path)| match result {
                Ok(identifiers) => self.add_tag_identifiers(Path::new(path), identifiers),
                Err(e) => {
                    warn!(path = %path, "skipping tag file: {e}");
                    0
                }
            })
            .sum()
    }
}
