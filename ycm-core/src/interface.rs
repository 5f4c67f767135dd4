//! FFI surface types and the completer service trait.

use thiserror::Error;

/// A path with its fuzzy score in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ScoredPath {
    pub path: String,
    pub score: f64,
}

/// Error type for completer operations
#[derive(Debug, Error, uniffi::Error)]
pub enum CompleterError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Tag file error: {0}")]
    Tags(String),
    #[error("Query superseded by a newer one")]
    Superseded,
    #[error("Operation cancelled")]
    Cancelled,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier completion as seen by the host editor.
/// Implemented by [`crate::IdentifierCompleter`].
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait IdentifierCompleterApi: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Ranked identifiers for `query` on a blocking worker. Only the most
    /// recent call completes; older in-flight ones resolve to `Superseded`.
    async fn query_async(&self, query: String, filetype: String, max_candidates: u32) -> Result<Vec<String>, CompleterError>;

    /// Ranked identifiers of `filetype`. `max_candidates == 0` means no limit.
    fn candidates_for_query_and_type(&self, query: String, filetype: String, max_candidates: u32) -> Vec<String>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Population
    // ─────────────────────────────────────────────────────────────────────────────

    fn add_identifiers_to_database(&self, identifiers: Vec<String>, filetype: String, filepath: String);

    /// Replace everything stored for one file.
    fn clear_for_file_and_add_identifiers_to_database(&self, identifiers: Vec<String>, filetype: String, filepath: String);

    /// Replace a file's identifiers with those parsed out of `buffer`.
    fn add_identifiers_to_database_from_buffer(
        &self,
        filetype: String,
        filepath: String,
        buffer: String,
        collect_from_comments_and_strings: bool,
    );

    /// Load ctags files. Returns the number of identifiers added.
    fn add_identifiers_to_database_from_tag_files(&self, tag_files: Vec<String>) -> u64;
}

impl From<crate::config::ConfigError> for CompleterError {
    fn from(e: crate::config::ConfigError) -> Self {
        match e {
            crate::config::ConfigError::Io(io) => CompleterError::Io(io.to_string()),
            other => CompleterError::Config(other.to_string()),
        }
    }
}

impl From<crate::identifier_utils::TagsError> for CompleterError {
    fn from(e: crate::identifier_utils::TagsError) -> Self {
        CompleterError::Tags(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_config_io_maps_to_io() {
        let err: CompleterError = ConfigError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).into();
        assert!(matches!(err, CompleterError::Io(_)));
    }

    #[test]
    fn test_config_invalid_maps_to_config() {
        let err: CompleterError = ConfigError::Invalid("bad".into()).into();
        assert_eq!(err.to_string(), "Configuration error: Invalid configuration: bad");
    }
}
