//! Error types for Glossa core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.
//!
//! Conditions a command recovers from locally (a duplicate pair, a term that
//! is not in the glossary) are not errors; see [`crate::store::MutationOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using GlossaError
pub type Result<T> = std::result::Result<T, GlossaError>;

/// Core error types for Glossa operations.
#[derive(Error, Debug)]
pub enum GlossaError {
    // === Glossary Errors ===
    /// `create` was called for a glossary file that is already present
    #[error("glossary {path} already exists")]
    GlossaryExists { path: PathBuf },

    /// The glossary file does not exist
    #[error("glossary {path} not found")]
    GlossaryNotFound { path: PathBuf },

    /// The glossary file exists but is not a valid term sequence
    #[error("glossary {path} is malformed: {reason}")]
    MalformedGlossary { path: PathBuf, reason: String },

    /// A term record failed validation (e.g. empty source term)
    #[error("invalid term: {reason}")]
    InvalidTerm { reason: String },

    /// A glossary name or language code is unusable
    #[error("invalid glossary: {reason}")]
    InvalidGlossary { reason: String },

    // === Index Errors ===
    /// The index file is missing or could not be found
    #[error("index not found at {path}, run `glossa index` first")]
    IndexNotFound { path: PathBuf },

    /// The index file exists but is corrupted or unreadable
    #[error("index is corrupted: {reason}")]
    IndexCorrupted { reason: String },

    /// The index format version doesn't match the current version
    #[error("index version mismatch: found {found}, expected {expected}")]
    IndexVersionMismatch { found: u32, expected: u32 },

    /// The index location could not be opened
    #[error("index unavailable at {path}: {reason}")]
    IndexUnavailable { path: PathBuf, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GlossaError {
    /// Returns true if this error means the index must be rebuilt
    pub fn requires_reindex(&self) -> bool {
        matches!(
            self,
            GlossaError::IndexNotFound { .. }
                | GlossaError::IndexCorrupted { .. }
                | GlossaError::IndexVersionMismatch { .. }
        )
    }

    /// Returns true if this error concerns the existence of the glossary file
    /// itself, as opposed to its content or the environment.
    pub fn is_existence_error(&self) -> bool {
        matches!(
            self,
            GlossaError::GlossaryExists { .. } | GlossaError::GlossaryNotFound { .. }
        )
    }

    /// Create an invalid term error
    pub fn invalid_term(reason: impl Into<String>) -> Self {
        GlossaError::InvalidTerm {
            reason: reason.into(),
        }
    }

    /// Create an invalid glossary error
    pub fn invalid_glossary(reason: impl Into<String>) -> Self {
        GlossaError::InvalidGlossary {
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        GlossaError::Serialization(reason.into())
    }
}

impl From<bincode::Error> for GlossaError {
    fn from(err: bincode::Error) -> Self {
        GlossaError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reindex() {
        let err = GlossaError::IndexNotFound {
            path: PathBuf::from("/test"),
        };
        assert!(err.requires_reindex());

        let err = GlossaError::IndexCorrupted {
            reason: "bad footer".to_string(),
        };
        assert!(err.requires_reindex());

        let err = GlossaError::GlossaryNotFound {
            path: PathBuf::from("/test/spec.en.ja.yml"),
        };
        assert!(!err.requires_reindex());
    }

    #[test]
    fn test_existence_errors() {
        assert!(GlossaError::GlossaryExists {
            path: PathBuf::from("a.en.ja.yml")
        }
        .is_existence_error());
        assert!(!GlossaError::invalid_term("empty").is_existence_error());
    }

    #[test]
    fn test_display_names_path() {
        let err = GlossaError::GlossaryNotFound {
            path: PathBuf::from("/home/g/spec.en.ja.yml"),
        };
        assert_eq!(err.to_string(), "glossary /home/g/spec.en.ja.yml not found");
    }
}
