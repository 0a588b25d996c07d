//! Failures of the search pipeline as seen by clients

use crate::metrics::Outcome;

/// Every way a search request can fail.
///
/// Per-result translation failures are not errors; those results keep their
/// original name.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Missing or malformed request parameters
    #[error("{0}")]
    InvalidInput(String),

    /// The query could not be translated into the catalog language
    #[error("Failed to translate query.")]
    TranslationFailed,

    /// The catalog search returned no usable result list
    #[error("Failed to fetch product search results.")]
    SearchFailed,

    /// Transport faults and anything else unforeseen; never shown to clients
    #[error("unexpected failure: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl SearchError {
    /// Message safe to return to the client
    pub fn public_message(&self) -> String {
        match self {
            SearchError::Unexpected(_) => "An error occurred. Please try again.".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the client is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::InvalidInput(_))
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            SearchError::InvalidInput(_) => Outcome::InvalidInput,
            SearchError::TranslationFailed => Outcome::TranslationFailed,
            SearchError::SearchFailed => Outcome::SearchFailed,
            SearchError::Unexpected(_) => Outcome::Unexpected,
        }
    }
}
