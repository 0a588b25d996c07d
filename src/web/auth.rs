//! Optional bearer-token authentication for the search endpoint

use super::response::error_response;
use super::state::AppState;
use crate::config::Secret;
use crate::metrics::Outcome;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::warn;

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Whether `token` matches any accepted token
pub fn is_authorized(token: &str, accepted: &[Secret]) -> bool {
    accepted
        .iter()
        .filter(|t| !t.is_blank())
        .any(|t| constant_time_compare(token, t.expose()))
}

/// Middleware enforcing bearer authentication when `server.require_auth` is set
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let server = &state.settings.server;
    if !server.require_auth {
        return next.run(request).await;
    }

    let authorized = bearer_token(request.headers())
        .is_some_and(|token| is_authorized(token, &server.api_tokens));
    if !authorized {
        warn!("Rejected unauthenticated request to {}", request.uri().path());
        state.metrics.record_outcome(Outcome::Unauthorized);
        return error_response(StatusCode::UNAUTHORIZED, "Unauthenticated.");
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("", "secret"));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer  abc123 "));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_is_authorized() {
        let accepted = vec![Secret::new("one"), Secret::new(""), Secret::new("two")];
        assert!(is_authorized("one", &accepted));
        assert!(is_authorized("two", &accepted));
        assert!(!is_authorized("three", &accepted));
        assert!(!is_authorized("", &accepted));
    }
}
