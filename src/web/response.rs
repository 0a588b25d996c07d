//! JSON response bodies

use crate::results::LocalizedResult;
use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Successful search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<LocalizedResult>,
}

impl SearchResponse {
    pub fn new(results: Vec<LocalizedResult>) -> Self {
        Self {
            success: true,
            results,
        }
    }
}

/// Failure response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Build a `{ success: false, message }` response
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error_response(status, self.public_message())
    }
}
