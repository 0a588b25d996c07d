//! HTTP request handlers

use super::response::SearchResponse;
use super::state::AppState;
use crate::metrics::Outcome;
use crate::search::{SearchError, SearchParams};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

/// Translate a query, search the catalog, and translate the results back.
///
/// `GET /v1/translate?query=<text>&lang=<code>`
pub async fn translate_and_search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let result = match params {
        Ok(Query(params)) => state.search.execute(&params).await,
        Err(rejection) => Err(SearchError::InvalidInput(rejection.body_text())),
    };

    match result {
        Ok(results) => {
            state.metrics.record_outcome(Outcome::Success);
            Json(SearchResponse::new(results)).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected search request: {}", e);
            }
            state.metrics.record_outcome(e.outcome());
            e.into_response()
        }
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Metrics snapshot handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
