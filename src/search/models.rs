//! Search request models

use super::error::SearchError;
use crate::locales::normalize_language_code;
use serde::Deserialize;

/// Raw query parameters of `GET /v1/translate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Search query in the user's language
    pub query: Option<String>,
    /// User's language code (e.g. "mn")
    pub lang: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            lang: Some(lang.into()),
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query text, trimmed
    pub query: String,
    /// Canonical language tag
    pub lang: String,
}

impl TryFrom<&SearchParams> for SearchRequest {
    type Error = SearchError;

    fn try_from(params: &SearchParams) -> Result<Self, Self::Error> {
        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        let lang = params
            .lang
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let (query, lang) = match (query, lang) {
            (Some(query), Some(lang)) => (query, lang),
            _ => {
                return Err(SearchError::InvalidInput(
                    "Query and language are required.".to_string(),
                ))
            }
        };

        let lang = normalize_language_code(lang).ok_or_else(|| {
            SearchError::InvalidInput(format!("Unsupported language code: {:?}.", lang))
        })?;

        Ok(Self {
            query: query.to_string(),
            lang,
        })
    }
}
