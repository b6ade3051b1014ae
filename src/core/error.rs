//! Error kinds surfaced by the triad core
//!
//! Scoring, indexing and ranking all report failures through [`TriadError`].
//! Glue code (CLI, config files, checkpoints) keeps using `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriadError {
    /// Empty batch, mismatched batch lengths, negative `k`, bad weights...
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// A neural scorer could not be constructed (missing model or checkpoint).
    #[error("scorer unavailable: {0}")]
    ScorerUnavailable(String),

    /// Failure inside an external backbone at inference time.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl TriadError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TriadError::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        TriadError::ScorerUnavailable(msg.into())
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TriadError::InvalidInput(_) => "invalid_input",
            TriadError::DuplicateDocument(_) => "duplicate_document",
            TriadError::DocumentNotFound(_) => "document_not_found",
            TriadError::ScorerUnavailable(_) => "scorer_unavailable",
            TriadError::Backend(_) => "backend",
        }
    }
}

pub type Result<T> = std::result::Result<T, TriadError>;
