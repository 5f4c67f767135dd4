//! ycm-core - identifier completion engine
//!
//! Stores the identifiers seen in a user's files, grouped by filetype and file,
//! and ranks them against a short typed query the way an editor completion
//! menu expects: subsequence matching with smart case, then word-boundary and
//! prefix heuristics. A separate backtracking scorer ranks file paths.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Object)]).

pub mod candidate;
pub mod completer;
pub mod config;
pub mod database;
pub mod filter;
pub mod identifier_utils;
pub mod interface;
pub mod letter_index;
pub mod logging;
pub mod matcher;
pub mod path_score;
pub mod ranking;
pub mod repository;
mod worker_pool;

pub use candidate::Candidate;
pub use completer::IdentifierCompleter;
pub use config::CompleterConfig;
pub use database::IdentifierDatabase;
pub use interface::*;
pub use ranking::MatchResult;
pub use repository::CandidateRepository;

uniffi::setup_scaffolding!("ycm_core");
