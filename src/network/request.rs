//! Outbound request and response types

use std::collections::HashMap;

/// HTTP request to be made to an upstream service
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// Request body
    pub data: Option<RequestBody>,
}

impl OutboundRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            params: Vec::new(),
            data: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }

    /// Whether a header was set explicitly (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
}

/// HTTP response from an upstream service
#[derive(Debug)]
pub struct OutboundResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl OutboundResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with the status and a short body excerpt unless the response is 2xx
    pub fn error_for_status(self, service: &str) -> anyhow::Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let excerpt: String = self.text.chars().take(200).collect();
        Err(anyhow::anyhow!(
            "{} returned HTTP {}: {}",
            service,
            self.status,
            excerpt
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, text: &str) -> OutboundResponse {
        OutboundResponse {
            status,
            headers: HashMap::new(),
            text: text.to_string(),
            url: "http://upstream.test/".to_string(),
        }
    }

    #[test]
    fn test_builder_keeps_insertion_order() {
        let request = OutboundRequest::get("http://upstream.test/search")
            .param("q", "tv")
            .param("start", "0")
            .header("x-api-key", "k");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.params[0], ("q".to_string(), "tv".to_string()));
        assert_eq!(request.params[1].0, "start");
        assert!(request.has_header("X-API-KEY"));
        assert!(!request.has_header("User-Agent"));
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(204, "").error_for_status("translator").is_ok());

        let err = response(503, "upstream unavailable")
            .error_for_status("translator")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("translator"));
    }
}
