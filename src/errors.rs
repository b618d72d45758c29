//! # Error Types Module
//!
//! Error type shared by the fallible parts of the crate: vocabulary loading,
//! matcher construction, configuration and the ingredient stores.
//! Parsing, detection and ranking themselves never fail.

use thiserror::Error;

/// Errors raised while building or feeding the lexicon engine
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The multi-pattern matcher could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    /// Reading a vocabulary or configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A vocabulary file is not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Vocabulary content is unusable (blank or duplicated terms)
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
    /// An ingredient store rejected an operation
    #[error("Store error: {0}")]
    Store(String),
    /// Database failure in the PostgreSQL store
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result alias used across the crate
pub type LexiconResult<T> = Result<T, LexiconError>;
